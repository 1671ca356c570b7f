use std::io::{self, BufRead, Write};

use crate::tag::Classification;

pub const SKIP_WARN_ENV: &str = "IMAGE_REV_SKIP_WARN";

pub fn skip_warn_set() -> bool {
    std::env::var(SKIP_WARN_ENV).is_ok_and(|v| !v.is_empty())
}

/// Asks for confirmation before deploying a non-release reference. Trusted
/// references pass silently. Warnings and the prompt go to `diag` only;
/// stdout is reserved for the resolved commit.
pub fn authorize(
    reference: &str,
    classification: Classification,
    skip_warn: bool,
    input: &mut impl BufRead,
    diag: &mut impl Write,
) -> io::Result<bool> {
    if classification == Classification::Trusted {
        return Ok(true);
    }

    writeln!(
        diag,
        "\nThe provided tag \"{reference}\" does not reference a release tag and may not\nbe stable."
    )?;

    if skip_warn {
        writeln!(
            diag,
            "Proceeding automatically since the \"{SKIP_WARN_ENV}\" environment variable was set."
        )?;
        return Ok(true);
    }

    writeln!(diag, "\nIf you would like to continue deployment, please type YES below.")?;
    write!(diag, "\nContinue: ")?;
    diag.flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("yes"))
}
