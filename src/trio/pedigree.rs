use crate::utils::{open_table_reader, Result};
use std::{
    collections::{hash_map::Entry, HashMap},
    io::BufRead,
    path::Path,
};

const UNKNOWN_PARENT: &str = "0";

fn is_unknown_parent(id: &str) -> bool {
    id.is_empty() || id == UNKNOWN_PARENT
}

#[derive(Debug, PartialEq, Clone)]
pub struct Parents {
    pub father_id: String,
    pub mother_id: String,
}

/// Individuals with both parents known, read from a PLINK `.fam` file.
#[derive(Debug, Default, Clone)]
pub struct Pedigree {
    parents: HashMap<String, Parents>,
}

impl Pedigree {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = open_table_reader(path)?;
        Self::from_reader(reader).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Parses `family individual father mother sex phenotype` lines.
    ///
    /// Only individual, father and mother are used. Tab-separated lines keep
    /// empty fields in place. Individuals with an unknown or empty parent and
    /// lines without a mother column are skipped. Repeated identical lines are
    /// collapsed; an individual listed with two different sets of parents is an error.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut parents: HashMap<String, Parents> = HashMap::new();
        let mut duplicates = Vec::new();

        for (line_number, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|e| format!("Error reading line {}: {}", line_number + 1, e))?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = if line.contains('\t') {
                line.split('\t').map(str::trim).collect()
            } else {
                line.split_whitespace().collect()
            };
            let (individual_id, father_id, mother_id) = match &fields[..] {
                [_, individual, father, mother, ..] => (*individual, *father, *mother),
                _ => {
                    log::warn!(
                        "Skipping line {} without individual/father/mother: {}",
                        line_number + 1,
                        line
                    );
                    continue;
                }
            };

            if individual_id.is_empty()
                || is_unknown_parent(father_id)
                || is_unknown_parent(mother_id)
            {
                continue;
            }

            let entry = Parents {
                father_id: father_id.to_string(),
                mother_id: mother_id.to_string(),
            };
            match parents.entry(individual_id.to_string()) {
                Entry::Occupied(existing) if *existing.get() != entry => {
                    duplicates.push((line_number + 1, line.clone()));
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
            }
        }

        if !duplicates.is_empty() {
            for (line_number, line) in &duplicates {
                log::error!("Duplicate individual at line {}: {}", line_number, line);
            }
            return Err(format!(
                "Found {} duplicate individual ids",
                duplicates.len()
            ));
        }

        Ok(Self { parents })
    }

    pub fn parents(&self, individual_id: &str) -> Option<&Parents> {
        self.parents.get(individual_id)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
