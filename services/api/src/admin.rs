use clap::Subcommand;
use freesite_intake::applications::{
    ApplicationId, ApplicationService, ApplicationStore, SupabaseStore,
};
use freesite_intake::config::AppConfig;
use freesite_intake::error::AppError;
use serde_json::json;
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub(crate) enum ApplicationsCommand {
    /// List every application, newest first
    List,
    /// Show a single application by id
    Show {
        /// Store-assigned application id
        id: String,
    },
    /// List applications submitted with an email address
    ByEmail {
        /// Email address (matched after trimming and lower-casing)
        email: String,
    },
    /// Print the approved count and remaining promotion spots
    Count,
}

pub(crate) async fn run(command: ApplicationsCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = Arc::new(SupabaseStore::new(&config.store)?);
    let service = ApplicationService::new(store, config.promotion);

    let output = render(&service, command).await?;
    println!("{output}");
    Ok(())
}

pub(crate) async fn render<S>(
    service: &ApplicationService<S>,
    command: ApplicationsCommand,
) -> Result<String, AppError>
where
    S: ApplicationStore + 'static,
{
    let value = match command {
        ApplicationsCommand::List => serde_json::to_value(service.list().await?)?,
        ApplicationsCommand::Show { id } => {
            serde_json::to_value(service.get(&ApplicationId(id)).await?)?
        }
        ApplicationsCommand::ByEmail { email } => {
            serde_json::to_value(service.by_email(&email).await?)?
        }
        ApplicationsCommand::Count => {
            let availability = service.availability().await?;
            json!({
                "count": availability.count,
                "spotsLeft": availability.spots_left,
                "capacity": service.capacity(),
            })
        }
    };

    Ok(serde_json::to_string_pretty(&value)?)
}
