// Folio entry point.
// `folio` (or `folio serve`) runs the HTTP proxy; `folio desk` opens the terminal desk.

use std::env;

use actix_web::{App, HttpServer, middleware, web};
use tracing::info;

use folio::handlers::{AppState, configure_routes};
use folio::proxy::RepoProxy;
use folio::{Config, FolioError, Result, desk, logging};

/// What to run, picked by the first argument.
enum Mode {
    Serve,
    Desk,
}

fn parse_mode(arg: Option<&str>) -> Result<Mode> {
    match arg {
        None | Some("serve") => Ok(Mode::Serve),
        Some("desk") => Ok(Mode::Desk),
        Some(other) => Err(FolioError::InvalidInput(format!(
            "unknown command '{}', expected 'serve' or 'desk'",
            other
        ))),
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let mode = parse_mode(env::args().nth(1).as_deref())?;
    let config = Config::from_env()?;

    match mode {
        Mode::Serve => {
            logging::init_stderr();
            serve(config).await
        }
        Mode::Desk => {
            logging::init_desk()?;
            let proxy = RepoProxy::from_config(&config).await?;
            desk::run(proxy, config.desk_repos).await
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let proxy = RepoProxy::from_config(&config).await?;
    let state = web::Data::new(AppState { proxy });

    let addr = config.bind_addr();
    info!("Starting folio proxy on {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(&addr)?
    .run()
    .await?;
    Ok(())
}
