//! Region classification from free-text locations.
//!
//! The keyword table is a best-effort heuristic: a location is lowercased,
//! stripped of Portuguese diacritics and whitespace-collapsed, then scanned
//! for the first `(token, region)` pair whose token it contains. Full state
//! and capital names come before the two-letter abbreviations, so
//! "Rio Grande do Sul" resolves before the bare "rio" token does.

use crate::models::estimate::Region;

pub trait RegionClassifier: Send + Sync {
    /// Region for `location`, or `None` when nothing matched.
    fn lookup(&self, location: &str) -> Option<Region>;
}

const KEYWORDS: &[(&str, Region)] = &[
    // ── Multi-word names that contain a shorter token of another region ──
    ("rio grande do sul", Region::South),
    ("rio grande do norte", Region::Northeast),
    ("rio branco", Region::North),
    ("porto alegre", Region::South),
    ("porto velho", Region::North),
    ("campo grande", Region::CentralWest),
    ("joao pessoa", Region::Northeast),
    ("sao luis", Region::Northeast),
    // ── Southeast ──
    ("sao paulo", Region::Southeast),
    ("rio de janeiro", Region::Southeast),
    ("minas gerais", Region::Southeast),
    ("espirito santo", Region::Southeast),
    ("belo horizonte", Region::Southeast),
    ("vitoria", Region::Southeast),
    // ── Northeast ──
    ("bahia", Region::Northeast),
    ("salvador", Region::Northeast),
    ("ceara", Region::Northeast),
    ("fortaleza", Region::Northeast),
    ("pernambuco", Region::Northeast),
    ("recife", Region::Northeast),
    ("paraiba", Region::Northeast),
    ("natal", Region::Northeast),
    ("alagoas", Region::Northeast),
    ("maceio", Region::Northeast),
    ("sergipe", Region::Northeast),
    ("aracaju", Region::Northeast),
    ("maranhao", Region::Northeast),
    ("piaui", Region::Northeast),
    ("teresina", Region::Northeast),
    // ── South ──
    ("santa catarina", Region::South),
    ("florianopolis", Region::South),
    ("parana", Region::South),
    ("curitiba", Region::South),
    // ── Central-West ──
    ("mato grosso", Region::CentralWest),
    ("cuiaba", Region::CentralWest),
    ("goias", Region::CentralWest),
    ("goiania", Region::CentralWest),
    ("distrito federal", Region::CentralWest),
    ("brasilia", Region::CentralWest),
    // ── North ──
    ("amazonas", Region::North),
    ("manaus", Region::North),
    ("belem", Region::North),
    ("rondonia", Region::North),
    ("roraima", Region::North),
    ("boa vista", Region::North),
    ("amapa", Region::North),
    ("macapa", Region::North),
    ("tocantins", Region::North),
    ("palmas", Region::North),
    ("acre", Region::North),
    // ── Large non-capital cities whose names hide a state abbreviation ──
    ("campinas", Region::Southeast),
    ("santos", Region::Southeast),
    ("guarulhos", Region::Southeast),
    ("sorocaba", Region::Southeast),
    ("ribeirao preto", Region::Southeast),
    ("uberlandia", Region::Southeast),
    ("juiz de fora", Region::Southeast),
    ("niteroi", Region::Southeast),
    ("londrina", Region::South),
    ("maringa", Region::South),
    ("joinville", Region::South),
    ("blumenau", Region::South),
    ("caxias do sul", Region::South),
    ("pelotas", Region::South),
    ("feira de santana", Region::Northeast),
    ("campina grande", Region::Northeast),
    ("anapolis", Region::CentralWest),
    ("santarem", Region::North),
    // ── Short names ──
    ("rio", Region::Southeast),
    ("minas", Region::Southeast),
    // ── State abbreviations ──
    ("sp", Region::Southeast),
    ("rj", Region::Southeast),
    ("mg", Region::Southeast),
    ("ba", Region::Northeast),
    ("ce", Region::Northeast),
    ("pe", Region::Northeast),
    ("rs", Region::South),
    ("sc", Region::South),
    ("pr", Region::South),
    ("mt", Region::CentralWest),
    ("ms", Region::CentralWest),
    ("go", Region::CentralWest),
    ("df", Region::CentralWest),
    ("am", Region::North),
    ("pa", Region::North),
    ("ac", Region::North),
    ("ro", Region::North),
    ("rr", Region::North),
    ("ap", Region::North),
    ("to", Region::North),
];

/// Classifier backed by the built-in keyword table.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl RegionClassifier for KeywordClassifier {
    fn lookup(&self, location: &str) -> Option<Region> {
        let haystack = normalize_location(location);
        if haystack.is_empty() {
            return None;
        }
        KEYWORDS
            .iter()
            .find(|(token, _)| haystack.contains(token))
            .map(|(_, region)| *region)
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Combining diacritical marks, as left by NFD input ("Sa\u{303}o").
fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
}

/// Lowercase, accent-fold and collapse whitespace. Precomposed and
/// decomposed spellings normalize to the same string.
pub fn normalize_location(location: &str) -> String {
    let folded: String = location
        .chars()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(fold_accent)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
