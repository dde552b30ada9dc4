use anyhow::Result;
use env_logger::{Builder, Env};
use log::debug;

mod cli;
mod util;
mod cmd_init;
mod cmd_set;
mod cmd_snapshot;
mod cmd_status;
mod cmd_list;

use zfs_hanoi::{PolicyUpdate, ZfsStore};

fn init_logger(verbose: bool) {
    // Уровень берём из RUST_LOG, иначе info (debug с --verbose).
    let default = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .init();
}

fn main() {
    let cli = cli::Cli::parse();
    init_logger(cli.verbose);

    if let Err(e) = run(cli) {
        // stderr напрямую: RUST_LOG=off не должен глушить фатальную ошибку
        eprintln!("{}", error_line(&e));
        std::process::exit(1);
    }
}

fn error_line(e: &anyhow::Error) -> String {
    format!("error: {:#}", e)
}

fn run(cli: cli::Cli) -> Result<()> {
    let cfg = cli.config();
    debug!("{}", cfg);
    let mut store = ZfsStore::new(&cfg);

    match cli.cmd {
        cli::Cmd::Init { volume, policy, tapes, date_format, prefix } =>
            cmd_init::exec(&mut store, volume, policy, tapes, date_format, prefix),

        cli::Cmd::Set { volume, policy, tapes, date_format, prefix, skip, sequence } => {
            let update = PolicyUpdate { tapes, date_format, prefix, skip, sequence };
            cmd_set::exec(&mut store, volume, policy, update)
        }

        cli::Cmd::Snapshot { volume, policy, recursive } =>
            cmd_snapshot::exec(&mut store, &cfg, volume, policy, recursive),

        cli::Cmd::Status { volume, policy, json } =>
            cmd_status::exec(&mut store, volume, policy, json),

        cli::Cmd::List { volume, policy, json } =>
            cmd_list::exec(&mut store, volume, policy, json),
    }
}

#[cfg(test)]
mod tests {
    use super::error_line;
    use anyhow::Context;
    use zfs_hanoi::HanoiError;

    #[test]
    fn error_line_carries_the_whole_chain_once() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no zfs binary");
        let e = Err::<(), _>(HanoiError::from(io))
            .context("snapshot tick for policy 'p' on tank")
            .unwrap_err();
        let line = error_line(&e);
        assert!(line.starts_with("error: snapshot tick for policy 'p' on tank: "), "{line}");
        assert_eq!(line.matches("no zfs binary").count(), 1, "{line}");
    }
}
