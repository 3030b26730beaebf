use phf::{Set, phf_set};

static ELEMENT_SYMBOLS: Set<&'static str> = phf_set! {
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca",
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd",
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb",
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th",
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og", "D",
};

/// Two-letter halogens that win over the one-letter reading of an atom name (`CL1` is chlorine).
static HALOGEN_PREFIXES: Set<&'static str> = phf_set! { "Cl", "Br" };

/// Represents a single atom of a molecule as read from a structure file.
///
/// Coordinates are not stored here; they live in the coordinate frames of the owning
/// [`Molecule`](super::molecule::Molecule), indexed by the atom's position in the atom list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// Element symbol (e.g., "C", "Cl").
    pub symbol: String,
    /// Display name of the atom (e.g., "C1", "CA").
    pub name: String,
    /// Name of the residue or molecule this atom belongs to (e.g., "UNK").
    pub mol_name: String,
    /// 1-based serial id.
    pub id: usize,
    /// Residue or molecule id.
    pub mol_id: isize,
}

impl Atom {
    /// Creates a new `Atom`.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The element symbol.
    /// * `name` - The display name.
    /// * `mol_name` - The residue/molecule name.
    /// * `id` - The 1-based serial id.
    /// * `mol_id` - The residue/molecule id.
    pub fn new(symbol: &str, name: &str, mol_name: &str, id: usize, mol_id: isize) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            mol_name: mol_name.to_string(),
            id,
            mol_id,
        }
    }
}

/// Returns `true` if `symbol` is a known element symbol (case-sensitive, e.g. "Cl" not "CL").
pub fn is_element_symbol(symbol: &str) -> bool {
    ELEMENT_SYMBOLS.contains(symbol)
}

/// Normalizes an element symbol to its canonical capitalization ("CL" -> "Cl").
///
/// Returns `None` if the result is not a known element.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let mut chars = raw.trim().chars();
    let first = chars.next()?.to_ascii_uppercase();
    let rest: String = chars.map(|c| c.to_ascii_lowercase()).collect();
    let symbol = format!("{}{}", first, rest);
    is_element_symbol(&symbol).then_some(symbol)
}

/// Guesses the element of an atom from its name.
///
/// Only the leading alphabetic run is considered. Chlorine and bromine are recognized by
/// their two-letter prefix; otherwise a valid one-letter element wins, so that `CA` reads as
/// carbon rather than calcium.
pub fn guess_element(atom_name: &str) -> Option<String> {
    let letters: String = atom_name
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }

    if letters.len() >= 2 {
        if let Some(two) = normalize_symbol(&letters[..2]) {
            if HALOGEN_PREFIXES.contains(two.as_str()) {
                return Some(two);
            }
        }
    }
    normalize_symbol(&letters[..1]).or_else(|| {
        if letters.len() >= 2 {
            normalize_symbol(&letters[..2])
        } else {
            None
        }
    })
}
