mod commands;

pub use commands::Cli;
pub use commands::Commands;
pub use commands::{Context, resolve_config};

use crate::error::Result;
use crate::storage::Store;

pub fn run(cli: Cli) -> Result<()> {
    let repo = match cli.repo {
        Some(repo) => repo,
        None => std::env::current_dir()?,
    };
    let store = Store::new(&repo);

    match cli.command {
        Some(Commands::Doctor) => return commands::doctor(&store),
        Some(Commands::Version) => return commands::version(),
        None => return commands::default_action(),
        _ => {}
    }

    let config = resolve_config(&store, cli.anchor.as_deref(), cli.weeks)?;
    let ctx = Context {
        store,
        config,
        json: cli.json,
        quiet: cli.quiet,
    };

    match cli.command {
        Some(Commands::Init) => commands::init(&ctx),
        Some(Commands::Detect { date, now }) => commands::detect(&ctx, &date, now.as_deref()),
        Some(Commands::Report { date, window, now }) => {
            commands::report(&ctx, &date, window, now.as_deref())
        }
        Some(Commands::Schedule { from, count, now }) => {
            commands::schedule(&ctx, from, count, now.as_deref())
        }
        Some(Commands::Days { start, end, list }) => commands::days(&ctx, &start, &end, list),
        Some(Commands::Capacity {
            start,
            end,
            team_size,
            entries,
        }) => commands::capacity(&ctx, &start, &end, team_size, entries.as_ref()),
        Some(Commands::Progress {
            start,
            end,
            completion,
            now,
        }) => commands::progress(&ctx, &start, &end, completion, now.as_deref()),
        Some(Commands::Health {
            completion,
            time_progress,
            days_remaining,
        }) => commands::health(&ctx, completion, time_progress, days_remaining),
        Some(Commands::Validate {
            team_size,
            start,
            end,
            claimed_potential,
        }) => commands::validate(&ctx, team_size, &start, &end, claimed_potential),
        Some(Commands::Legacy { date, now }) => commands::legacy(&ctx, &date, now.as_deref()),
        Some(Commands::Doctor) | Some(Commands::Version) | None => Ok(()),
    }
}
