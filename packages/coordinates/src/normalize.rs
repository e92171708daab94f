//! City name normalization.
//!
//! Produces the matching key used to join accident rows to the coordinate
//! table. The same pipeline runs when the table is built and when a name is
//! looked up, so "Délhi", " DELHI " and "delhi" all land on one key.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalizes a city name into its matching key.
///
/// The pipeline:
/// 1. Trim surrounding whitespace
/// 2. Lowercase
/// 3. NFKD decomposition
/// 4. Drop combining marks
///
/// Compatibility decomposition can surface new uppercase letters or
/// whitespace (e.g. `ℌ` → `H`), so the result is lowercased and trimmed
/// once more. This keeps `normalize(normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(input: &str) -> String {
    let folded = input.trim().to_lowercase();
    let stripped: String = folded.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.to_lowercase().trim().to_string()
}
