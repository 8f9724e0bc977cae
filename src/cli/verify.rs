use std::path::Path;

use tracing::info;

use crate::digits::common::DecimalPlaces;
use crate::digits::verifier::{verify_file, VerificationReport};
use crate::error::Result;

use super::args::VerifyArgs;

/// Verify a persisted file. A mismatch comes back as
/// `DigitsError::VerificationMismatch` so the caller can map it to an exit code.
pub fn verify_persisted(args: &VerifyArgs) -> Result<VerificationReport> {
    let decimal_places = DecimalPlaces::new(args.decimal_places)?;
    let report = verify_file(
        Path::new(&args.digits_path),
        decimal_places,
        args.context_radius,
    )?;
    info!("{}", report);
    report.into_result()
}
