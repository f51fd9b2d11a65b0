use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tawsil_client::{
    map::{LeafletSurface, MapReceiver, MapRenderer, MapMessage, MapState, MapSurface},
    models::tracking::TrackingView,
    ClientConfig, ClientState, TawsilError, TawsilResult,
};

#[derive(Parser, Debug)]
#[command(version, about = "Follow a tawsil delivery from the terminal", long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Backend base URL (overrides TAWSIL_BACKEND_URL)
    #[arg(short, long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in and keep the session for later runs
    Login {
        #[arg(short, long)]
        phone: String,

        #[arg(short = 'P', long)]
        password: String,
    },
    /// Live-track the driver of an order until Ctrl-C
    Track {
        order_id: String,

        /// Poll interval in milliseconds
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Keep a Leaflet map of the driver at this path
        #[arg(short, long)]
        map_html: Option<PathBuf>,
    },
    /// End the saved session
    Logout,
}

fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_tracing();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message("حدث خطأ غير متوقع"));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> TawsilResult<()> {
    let mut config = ClientConfig::default();
    if let Some(url) = args.backend_url {
        config.backend_url = url;
    }

    match args.command {
        Commands::Login { phone, password } => {
            let state = ClientState::new(config).await?;
            let user = state.session.login(&phone, &password).await?;
            println!("{} ({})", user.name, user.role.as_str());
            Ok(())
        }
        Commands::Track { order_id, interval_ms, map_html } => {
            if let Some(ms) = interval_ms {
                config.poll_interval = Duration::from_millis(ms);
            }
            let state = ClientState::new(config).await?;
            if state.session.check_auth().await?.is_none() {
                return Err(TawsilError::NotAuthenticated);
            }
            track(&state, &order_id, map_html).await
        }
        Commands::Logout => {
            let state = ClientState::new(config).await?;
            state.shutdown().await
        }
    }
}

async fn track(state: &ClientState, order_id: &str, map_html: Option<PathBuf>) -> TawsilResult<()> {
    let mut handle = state.tracking_service.start(order_id);
    // without a map file nobody drains the channel, so drop it
    let mut map_updates = handle.take_map_updates().filter(|_| map_html.is_some());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            view = handle.changed() => {
                let view = view?;
                print_view(&view);

                if let (Some(path), TrackingView::Live { snapshot, .. }) = (&map_html, &view) {
                    if let Some(map) = map_updates.as_ref().and(MapState::from_snapshot(snapshot)) {
                        let surface = HtmlFileSurface::create(path.clone(), map)?;
                        if let Some(updates) = map_updates.take() {
                            spawn_renderer(surface, updates);
                        }
                    }
                }
            }
        }
    }

    handle.close();
    Ok(())
}

fn spawn_renderer(surface: HtmlFileSurface, updates: MapReceiver) {
    tracing::info!("Writing live map to {}", surface.path.display());
    tokio::spawn(MapRenderer::new(surface).run(updates));
}

fn print_view(view: &TrackingView) {
    println!("{}", view.status_line());

    if let TrackingView::Live { snapshot, progress } = view {
        for status in &progress.steps {
            let mark = if status.current { ">" } else if status.active { "*" } else { " " };
            match status.eta_min {
                Some(eta) => println!("  [{}] {} (~{} دقيقة)", mark, status.step.label, eta),
                None => println!("  [{}] {}", mark, status.step.label),
            }
        }
        if let Some(km) = snapshot.distance_to_restaurant() {
            println!("  المسافة إلى المطعم: {} كم", km);
        }
        if let Some(uri) = snapshot.call_uri() {
            println!("  {}", uri);
        }
    }
}

/// Rewrites a Leaflet page on disk after every driver move
struct HtmlFileSurface {
    path: PathBuf,
    inner: LeafletSurface,
}

impl HtmlFileSurface {
    fn create(path: PathBuf, state: MapState) -> TawsilResult<Self> {
        let surface = Self { path, inner: LeafletSurface::new(state) };
        surface.write()?;
        Ok(surface)
    }

    fn write(&self) -> TawsilResult<()> {
        std::fs::write(&self.path, self.inner.html())?;
        Ok(())
    }
}

impl MapSurface for HtmlFileSurface {
    fn apply(&mut self, message: &MapMessage) -> TawsilResult<()> {
        self.inner.apply(message)?;
        for script in self.inner.drain_scripts() {
            tracing::debug!("{}", script);
        }
        self.write()
    }
}
