mod ui;

use tracing_subscriber::EnvFilter;

fn main() -> glib::ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cup_memory=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::info!("Cup Memory v{}", env!("CARGO_PKG_VERSION"));

    ui::app::run()
}
