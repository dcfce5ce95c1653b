use crate::commands::cli::InspectArgs;
use crate::project;
use folio_core::api::{
    AppConfig, CliError, ContainerKind, DocumentIndex, DocumentManager, EntityHandle, EntityKind,
    PageKey,
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct EntitySummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageKey>,
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub index: DocumentIndex,
    pub name: String,
    pub kind: ContainerKind,
    pub current: bool,
    pub entities: BTreeMap<String, Vec<EntitySummary>>,
}

pub async fn run(args: InspectArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let opened = project::open(&args.project, cfg).await?;
    let summaries = summarize(&opened.manager);

    if args.json {
        let json = serde_json::to_string_pretty(&summaries)
            .map_err(|e| CliError::Anyhow(e.into()))?;
        println!("{json}");
    } else {
        print!("{}", render(&summaries));
    }
    Ok(0)
}

pub fn summarize(manager: &DocumentManager) -> Vec<DocumentSummary> {
    let current = manager.current_index();
    manager
        .documents()
        .iter()
        .enumerate()
        .map(|(i, document)| {
            let index = DocumentIndex(i);
            let pages = manager.page_structure(index);
            let page_of = |kind: EntityKind, entity: &EntityHandle| -> Option<PageKey> {
                let pages = pages.as_ref()?;
                match kind {
                    EntityKind::Axes => pages.axes_name_map().get(entity.name()).copied(),
                    EntityKind::Datasets => pages.dataset_name_map().get(entity.name()).copied(),
                    EntityKind::Measurements => {
                        pages.measurement_page_map().get(&entity.id()).copied()
                    }
                }
            };

            let entities: BTreeMap<String, Vec<EntitySummary>> = EntityKind::ALL
                .into_iter()
                .map(|kind| {
                    let owned: Vec<EntitySummary> = manager
                        .entities_of(kind, index)
                        .iter()
                        .map(|entity| EntitySummary {
                            name: entity.name().to_string(),
                            page: page_of(kind, entity),
                        })
                        .collect();
                    (kind.as_str().to_string(), owned)
                })
                .collect();

            DocumentSummary {
                index,
                name: document.name.clone(),
                kind: document.kind,
                current: index == current,
                entities,
            }
        })
        .collect()
}

pub fn render(summaries: &[DocumentSummary]) -> String {
    let mut out = String::new();
    for doc in summaries {
        let marker = if doc.current { "*" } else { " " };
        let kind = match doc.kind {
            ContainerKind::Single => "single",
            ContainerKind::Paginated => "paginated",
        };
        out.push_str(&format!("{marker} [{}] {} ({kind})\n", doc.index, doc.name));
        for (kind, entities) in &doc.entities {
            if entities.is_empty() {
                continue;
            }
            let names: Vec<String> = entities
                .iter()
                .map(|e| match e.page {
                    Some(page) => format!("{} (p.{page})", e.name),
                    None => e.name.clone(),
                })
                .collect();
            out.push_str(&format!("    {kind}: {}\n", names.join(", ")));
        }
    }
    out
}
