//! Command-line entry point: resolve where the configured user belongs.

use std::sync::Arc;

use anyhow::Context;
use shds_auth::Screen;
use shds_client::screens::{login, students::StudentsList};
use shds_client::{
    ClientConfig, HttpDirectory, IdentitySession, Navigator, PortalContext, SessionStore,
    StaticTokenProvider, TracingNotifier,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shds_observability::init();

    let config = ClientConfig::from_env().context("invalid configuration")?;
    let directory = HttpDirectory::new(&config).context("failed to build HTTP client")?;
    tracing::info!(api_base = directory.base_url(), "starting portal client");

    let (writer, reader) = SessionStore::channel();
    let provider = StaticTokenProvider::from_config(&config);
    let identity = IdentitySession::new(Arc::new(provider), writer);
    if let Err(e) = identity.restore().await {
        tracing::warn!(error = %e, "continuing signed out");
    }

    let ctx = PortalContext::new(
        Arc::new(directory),
        reader,
        Navigator::new(Screen::Login),
        Arc::new(TracingNotifier),
    );

    match std::env::args().nth(1).as_deref() {
        None | Some("route") => {
            match std::env::args().nth(2) {
                None => {
                    login::decide(&ctx).await;
                }
                Some(path) => {
                    let screen = Screen::from_path(&path)
                        .with_context(|| format!("no screen at '{path}'"))?;
                    ctx.mount(screen).await;
                }
            }
            if !ctx.session.current().is_authenticated() {
                tracing::info!("not signed in; set SHDS_ID_TOKEN");
            }
            println!("{}", ctx.navigator.current());
        }
        Some("students") => {
            let (mounted, list) = StudentsList::open(&ctx).await;
            if !mounted.may_render() {
                anyhow::bail!(
                    "students list not available; redirected to {}",
                    ctx.navigator.current()
                );
            }
            for student in &list.students {
                println!(
                    "{}\t{}\t{}",
                    student.id,
                    student.display_name(),
                    student.guardian_phone.as_deref().unwrap_or_default()
                );
            }
        }
        Some(other) => {
            anyhow::bail!("unknown command '{other}' (expected 'route [PATH]' or 'students')")
        }
    }

    Ok(())
}
