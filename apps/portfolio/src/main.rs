use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use presentation_core::{
    page::standard_sections, stagger::EntranceStarted, ContactForm, ContactFormConfig,
    CopyAction, FormEvent, HttpSubmissionTransport, MemoryThemeStore, PageEvent, PageParts,
    PageUpdate, PortfolioPage, RevealEvent, SimulatedOutcome, SimulatedTransport,
    StaggeredSequencer, SubmissionTransport, ThemePreference, ThemeStore,
};
use shared::domain::{FieldName, SectionId, SubmissionStatus};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod config;
mod content;
mod platform;

use config::{load_settings, Settings};
use platform::{ArboardClipboard, FileThemeStore};

#[derive(Parser, Debug)]
#[command(about = "Drive the portfolio page's interaction engine from the terminal")]
struct Cli {
    /// Settings file; defaults to ./portfolio.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Simulate {
    Accept,
    Reject,
    Fail,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List projects, optionally filtered by category.
    Projects {
        #[arg(long)]
        category: Option<String>,
    },
    /// Feed visibility ratios to a section and print when it reveals.
    Reveal {
        #[arg(long)]
        section: String,
        #[arg(long, value_delimiter = ',', default_value = "0.0,0.05,0.2,0.0")]
        ratios: Vec<f32>,
    },
    /// Fill in and send the contact form.
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        /// Use an in-process endpoint instead of the configured one.
        #[arg(long, value_enum)]
        simulate: Option<Simulate>,
        #[arg(long, default_value_t = 400)]
        latency_ms: u64,
    },
    /// Copy the contact address to the clipboard.
    CopyEmail,
    /// Show or toggle the saved theme.
    Theme {
        #[arg(long)]
        toggle: bool,
    },
}

fn transport_for(
    settings: &Settings,
    simulate: Option<Simulate>,
    latency: Duration,
) -> Result<Arc<dyn SubmissionTransport>> {
    let Some(mode) = simulate else {
        if settings.access_key.is_empty() {
            bail!("access_key is not configured; set it in portfolio.toml or APP__ACCESS_KEY");
        }
        let transport =
            HttpSubmissionTransport::new(&settings.submit_endpoint, settings.request_timeout())?;
        tracing::info!(endpoint = transport.endpoint(), "submitting to configured endpoint");
        return Ok(Arc::new(transport));
    };
    let outcome = match mode {
        Simulate::Accept => SimulatedOutcome::Accept,
        Simulate::Reject => SimulatedOutcome::Reject("simulated rejection".into()),
        Simulate::Fail => SimulatedOutcome::TransportFailure("simulated network error".into()),
    };
    Ok(Arc::new(SimulatedTransport::new(outcome).with_latency(latency)))
}

fn theme_store(settings: &Settings) -> Arc<dyn ThemeStore> {
    let path = match &settings.theme_file {
        Some(path) => Ok(path.clone()),
        None => FileThemeStore::default_path(),
    };
    match path {
        Ok(path) => {
            let store = FileThemeStore::new(path);
            tracing::debug!(path = %store.path().display(), "theme preference file");
            Arc::new(store)
        }
        Err(err) => {
            tracing::warn!(error = %err, "theme preference will not be persisted");
            Arc::new(MemoryThemeStore::default())
        }
    }
}

fn build_page(settings: &Settings, transport: Arc<dyn SubmissionTransport>) -> PortfolioPage {
    let durations = settings.feedback_durations();
    let mut contact_config = ContactFormConfig::new(settings.access_key.clone());
    contact_config.success_banner = durations.success_banner;

    let mut page = PortfolioPage::new(PageParts {
        catalog: content::project_catalog(),
        contact: ContactForm::new(contact_config, transport),
        copy_email: CopyAction::new(Arc::new(ArboardClipboard), settings.contact_email.clone())
            .with_duration(durations.copy),
        theme: ThemePreference::init(theme_store(settings)),
        reveal_threshold: settings.reveal_threshold(),
    });
    for section in standard_sections() {
        let children = content::section_children(section.as_str());
        page.mount_section(section, children);
    }
    page
}

fn print_projects(page: &PortfolioPage) {
    let projects = page.projects();
    println!(
        "Filters: {} (selected: {})",
        projects.catalog().categories().join(" | "),
        projects.selected_category()
    );
    for item in projects.visible_items() {
        println!(
            "  #{} {} [{}]",
            item.id,
            content::title_of(item),
            item.category
        );
    }
}

async fn wait_until_cleared(label: &str, is_active: impl Fn() -> bool) {
    while is_active() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    println!("{label} cleared");
}

async fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;

    match cli.command {
        Command::Projects { category } => {
            let mut page = build_page(&settings, Arc::new(SimulatedTransport::accepting()));
            if let Some(category) = category {
                match page.handle(PageEvent::SelectCategory(category.clone())).await {
                    PageUpdate::FilterChanged {
                        transition,
                        visible,
                        entrance_delays,
                        ..
                    } => {
                        println!(
                            "Entering: {:?}, exiting: {:?}",
                            transition.entering, transition.exiting
                        );
                        for (id, delay) in visible.iter().zip(&entrance_delays) {
                            println!("  card #{id} enters after {delay:?}");
                        }
                    }
                    _ => println!("Unknown category '{category}', keeping current filter"),
                }
            }
            print_projects(&page);
        }
        Command::Reveal { section, ratios } => {
            let mut page = build_page(&settings, Arc::new(SimulatedTransport::accepting()));
            let mut reveals = page.reveal().subscribe();
            let (sink, mut started) = mpsc::unbounded_channel::<EntranceStarted>();
            let sequencer = StaggeredSequencer;
            let section = SectionId::new(section);
            let mut timers = Vec::new();

            for ratio in ratios {
                page.handle(PageEvent::Intersection {
                    section: section.clone(),
                    ratio,
                })
                .await;
                let revealed = page.reveal().is_revealed(&section);
                println!("ratio {ratio:.2} -> revealed={revealed}");
                while let Ok(RevealEvent::Revealed { section }) = reveals.try_recv() {
                    let schedule = sequencer.schedule(&section);
                    timers.extend(sequencer.play(&section.id, schedule, sink.clone()));
                }
            }
            drop(sink);

            let clock = tokio::time::Instant::now();
            while let Some(entrance) = started.recv().await {
                println!(
                    "  {} #{} started at {:?}",
                    entrance.element,
                    entrance.order,
                    clock.elapsed()
                );
            }
            for timer in timers {
                timer.await.context("entrance timer failed")?;
            }
        }
        Command::Submit {
            name,
            email,
            message,
            simulate,
            latency_ms,
        } => {
            let transport = transport_for(&settings, simulate, Duration::from_millis(latency_ms))?;
            let mut page = build_page(&settings, transport);
            let mut events = page.contact().subscribe();

            for (field, value) in [
                (FieldName::Name, name),
                (FieldName::Email, email),
                (FieldName::Message, message),
            ] {
                page.handle(PageEvent::EditField { field, value }).await;
            }

            if let PageUpdate::FormRejected(err) = page.handle(PageEvent::Submit).await {
                println!("Not sent: {}", err.user_message());
                return Ok(());
            }

            while let Ok(FormEvent::StatusChanged { from, to }) = events.recv().await {
                println!("status: {from:?} -> {to:?}");
                match to {
                    SubmissionStatus::Failed => {
                        let error = page.contact().error_message().await;
                        println!("{}", error.unwrap_or_default());
                        break;
                    }
                    SubmissionStatus::Succeeded => {
                        println!("Message Sent! I'll reply within 24 hours");
                    }
                    SubmissionStatus::Idle if from == SubmissionStatus::Succeeded => {
                        println!("success banner cleared");
                        break;
                    }
                    _ => {}
                }
            }
        }
        Command::CopyEmail => {
            let mut page = build_page(&settings, Arc::new(SimulatedTransport::accepting()));
            page.handle(PageEvent::CopyEmail).await;
            println!("Email copied! ({})", page.copy_email().text());
            let copy = page.copy_email().clone();
            wait_until_cleared("copy acknowledgement", || copy.is_acknowledged()).await;
        }
        Command::Theme { toggle } => {
            let mut page = build_page(&settings, Arc::new(SimulatedTransport::accepting()));
            if toggle {
                page.handle(PageEvent::ToggleTheme).await;
            }
            println!("theme: {}", page.theme().as_str());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();
    run(cli).await
}
