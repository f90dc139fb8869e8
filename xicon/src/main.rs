use anyhow::Result;
use clap::{Parser, Subcommand};
use xicon::{command, ExtractArgs, ReplaceArgs};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};
    tracing_log::LogTracer::init().ok();
    let env = std::env::var("XICON_LOG").unwrap_or_else(|_| "error".into());
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_span_events(FmtSpan::ACTIVE | FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::new(env))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
    log_panics::init();
    let args = Args::parse();
    args.command.run()
}

#[derive(Subcommand)]
enum Commands {
    /// Show which external tools are available
    Doctor,
    /// Cut a logo out of a circular frame
    Extract {
        #[clap(flatten)]
        args: ExtractArgs,
    },
    /// Replace all icons in a directory with renditions of a source image
    Replace {
        #[clap(flatten)]
        args: ReplaceArgs,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Self::Doctor => command::doctor(),
            Self::Extract { args } => {
                command::extract(&args.input(), &args.output(), args.locator())?;
            }
            Self::Replace { args } => {
                let config = args.config()?;
                let source = xicon::expand_home(&args.source);
                let dir = xicon::expand_home(&args.icons_dir);
                command::replace(&source, &dir, config, args.yes, args.verbose)?;
            }
        }
        Ok(())
    }
}
