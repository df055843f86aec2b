// ── Special CLI commands: --encrypt, --dumpjson, --debugio ──

use std::io::Read;

use tracing::{error, info};

use crate::error::PollerError;
use crate::metrics::Filter;
use crate::registry::Registry;

/// Print a bcrypt hash of the provided string, for the web UI accounts
/// map. `-` reads the password from stdin instead.
pub fn print_password_hash(password: &str) -> Result<(), PollerError> {
    let password = if password == "-" {
        eprint!("Enter Password: ");

        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| PollerError::Internal(format!("reading stdin: {e}")))?;

        buf.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        password.to_owned()
    };

    let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PollerError::Internal(format!("bcrypt: {e}")))?;
    println!("{hash}");

    Ok(())
}

/// Print a raw JSON payload from the first input plugin and exit.
///
/// The selector is `kind[:n] [path]`: kind picks the payload (devices,
/// clients, other), `n` picks a controller index, and `path` is the
/// endpoint for `other`.
pub async fn print_raw_metrics(registry: &Registry, selector: &str) -> Result<(), PollerError> {
    let mut filter = Filter::default();

    let (kind, path) = match selector.split_once(' ') {
        Some((k, p)) => (k, p),
        None => (selector, ""),
    };
    filter.path = path.to_owned();

    match kind.split_once(':') {
        Some((k, unit)) => {
            filter.kind = k.to_owned();
            filter.unit = unit.parse().unwrap_or_default();
        }
        None => filter.kind = kind.to_owned(),
    }

    let entry = registry
        .inputs()
        .into_iter()
        .next()
        .ok_or(PollerError::NoInputPlugins)?;

    let payload = entry.input.raw_metrics(&filter).await?;
    println!("{}", String::from_utf8_lossy(&payload));

    Ok(())
}

/// Run every plugin's self-check. All failures are reported before the
/// aggregate error is returned.
pub async fn debug_io(registry: &Registry) -> Result<(), PollerError> {
    let mut errs = Vec::new();

    let inputs = registry.inputs();
    info!("checking {} input(s)...", inputs.len());

    for (i, entry) in inputs.iter().enumerate() {
        info!("  ({}/{}) checking input {}...", i + 1, inputs.len(), entry.name);

        match entry.input.debug_input().await {
            Ok(()) => info!("    {} is OK", entry.name),
            Err(e) => {
                error!("    {} failed: {e}", entry.name);
                errs.push(format!("{}: {e}", entry.name));
            }
        }
    }

    let outputs = registry.outputs();
    info!("checking {} output(s)...", outputs.len());

    for (i, entry) in outputs.iter().enumerate() {
        info!("  ({}/{}) checking output {}...", i + 1, outputs.len(), entry.name);

        match entry.output.debug_output().await {
            Ok(()) => info!("    {} is OK", entry.name),
            Err(e) => {
                error!("    {} failed: {e}", entry.name);
                errs.push(format!("{}: {e}", entry.name));
            }
        }
    }

    match PollerError::join(errs) {
        Some(err) => {
            error!("not all checks passed, please fix the logged issues");
            Err(err)
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::print_password_hash;

    #[test]
    fn password_hash_round_trips() {
        // The printed hash must verify against the original input.
        let hash = bcrypt::hash("foo", bcrypt::DEFAULT_COST).expect("hash");
        assert!(bcrypt::verify("foo", &hash).expect("verify"));
        assert!(!bcrypt::verify("bar", &hash).expect("verify"));

        // And the command itself succeeds for a literal argument.
        assert!(print_password_hash("foo").is_ok());
    }
}
