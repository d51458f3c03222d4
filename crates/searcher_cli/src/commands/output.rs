use clap::ValueEnum;
use searcher::GitHubRepositoryModel;
use searcher::ReconcileReport;

/// Output format for repository listings.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

/// One stored repository, flattened for table display.
#[derive(Debug, Clone, tabled::Tabled)]
pub(crate) struct RepositoryRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Repository")]
    pub full_name: String,
    #[tabled(rename = "Language")]
    pub language: String,
    #[tabled(rename = "Stars")]
    pub stars: i32,
    #[tabled(rename = "Forks")]
    pub forks: i32,
    #[tabled(rename = "Updated")]
    pub updated: String,
}

impl From<&GitHubRepositoryModel> for RepositoryRow {
    fn from(model: &GitHubRepositoryModel) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name(),
            language: model.language.clone().unwrap_or_else(|| "-".to_string()),
            stars: model.stars_count,
            forks: model.forks_count,
            updated: model
                .last_updated
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub(crate) fn repositories_table(models: &[GitHubRepositoryModel]) -> String {
    let rows: Vec<RepositoryRow> = models.iter().map(RepositoryRow::from).collect();
    let mut table = tabled::Table::new(rows);
    table.with(tabled::settings::Style::rounded());
    table.to_string()
}

pub(crate) fn print_repositories(
    models: &[GitHubRepositoryModel],
    format: OutputFormat,
) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Table => {
            if models.is_empty() {
                println!("No repositories found.");
            } else {
                println!("{}", repositories_table(models));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(models)?);
        }
    }
    Ok(())
}

pub(crate) fn print_report(
    report: &ReconcileReport,
    format: OutputFormat,
) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Table => {
            if !report.repositories.is_empty() {
                println!("{}", repositories_table(&report.repositories));
            }
            println!(
                "{} fetched: {} new, {} updated, {} unchanged, {} skipped",
                report.repositories.len() + report.skipped,
                report.created,
                report.updated,
                report.unchanged,
                report.skipped
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
    }
    Ok(())
}
