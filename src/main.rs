use clap::{Parser, ValueEnum};
use miette::Result;
use ophub::cli::{Cli, Commands, OutputFormat};
use ophub::core::Config;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    // Logs go to stderr so they never mix with table or JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let mut global = cli.global;

    // A configured default format only replaces the built-in `auto`
    if global.format == OutputFormat::Auto {
        if let Some(format) = Config::load()
            .default_format
            .and_then(|f| OutputFormat::from_str(&f, true).ok())
        {
            global.format = format;
        }
    }

    match cli.command {
        Commands::Status(args) => ophub::cli::commands::status::run(args, &global),
        Commands::Ticket(cmd) => ophub::cli::commands::ticket::run(cmd, &global),
        Commands::Asset(cmd) => ophub::cli::commands::asset::run(cmd, &global),
        Commands::Wo(cmd) => ophub::cli::commands::wo::run(cmd, &global),
        Commands::Pm(cmd) => ophub::cli::commands::pm::run(cmd, &global),
        Commands::Sup(cmd) => ophub::cli::commands::sup::run(cmd, &global),
        Commands::Rfq(cmd) => ophub::cli::commands::rfq::run(cmd, &global),
        Commands::Po(cmd) => ophub::cli::commands::po::run(cmd, &global),
        Commands::Notify(cmd) => ophub::cli::commands::notify::run(cmd, &global),
        Commands::User(cmd) => ophub::cli::commands::user::run(cmd, &global),
        Commands::Data(cmd) => ophub::cli::commands::data::run(cmd, &global),
        Commands::Completions(args) => ophub::cli::commands::completions::run(args),
    }
}
