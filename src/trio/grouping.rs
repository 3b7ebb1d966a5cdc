use super::{Call, CallKey, CallRecord, CallStatus};
use crate::utils::format_number_with_commas;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy)]
pub struct TrioMember<'a> {
    pub record: &'a CallRecord,
    pub call: &'a Call,
}

impl<'a> TrioMember<'a> {
    pub fn sample_id(&self) -> &'a str {
        &self.record.row.sample_id
    }
}

/// Calls of a proband and both parents at the same locus and variant.
#[derive(Debug, Clone, Copy)]
pub struct Trio<'a> {
    pub proband: TrioMember<'a>,
    pub father: TrioMember<'a>,
    pub mother: TrioMember<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpairedReason {
    NoCall,
    InvalidCall,
    NoParents,
    MissingFather,
    MissingMother,
    MissingParents,
}

impl UnpairedReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnpairedReason::NoCall => "no_call",
            UnpairedReason::InvalidCall => "invalid_call",
            UnpairedReason::NoParents => "no_parents",
            UnpairedReason::MissingFather => "missing_father",
            UnpairedReason::MissingMother => "missing_mother",
            UnpairedReason::MissingParents => "missing_father_and_mother",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Unpaired<'a> {
    pub record: &'a CallRecord,
    pub reason: UnpairedReason,
}

#[derive(Debug, Default)]
pub struct TrioGrouping<'a> {
    pub trios: Vec<Trio<'a>>,
    pub unpaired: Vec<Unpaired<'a>>,
    pub num_families: usize,
}

/// Pairs every proband call with its parents' calls at the same locus and variant.
///
/// Every input row ends up either as the proband of a trio or in `unpaired`
/// with the reason it could not be paired. Rows used as parents of a trio are
/// also listed in `unpaired` under their own reason, as in the input.
pub fn group_by_trio(records: &[CallRecord]) -> TrioGrouping<'_> {
    let calls: HashMap<CallKey, TrioMember> = records
        .iter()
        .filter_map(|record| {
            record
                .call()
                .map(|call| (record.key(), TrioMember { record, call }))
        })
        .collect();

    let mut grouping = TrioGrouping::default();
    let mut families = HashSet::new();
    for record in records {
        let unpaired = |reason| Unpaired { record, reason };
        let proband = match &record.status {
            CallStatus::Called(call) => TrioMember { record, call },
            CallStatus::NoCall => {
                grouping.unpaired.push(unpaired(UnpairedReason::NoCall));
                continue;
            }
            CallStatus::Invalid(_) => {
                grouping.unpaired.push(unpaired(UnpairedReason::InvalidCall));
                continue;
            }
        };
        let (father_id, mother_id) = match (&record.father_id, &record.mother_id) {
            (Some(father_id), Some(mother_id)) => (father_id.as_str(), mother_id.as_str()),
            _ => {
                grouping.unpaired.push(unpaired(UnpairedReason::NoParents));
                continue;
            }
        };

        let (_, locus_id, variant_id) = record.key();
        let father = calls.get(&(father_id, locus_id, variant_id));
        let mother = calls.get(&(mother_id, locus_id, variant_id));
        match (father, mother) {
            (Some(&father), Some(&mother)) => {
                families.insert((proband.sample_id(), father_id, mother_id));
                grouping.trios.push(Trio {
                    proband,
                    father,
                    mother,
                });
            }
            (father, mother) => {
                let reason = match (father, mother) {
                    (None, None) => UnpairedReason::MissingParents,
                    (None, Some(_)) => UnpairedReason::MissingFather,
                    _ => UnpairedReason::MissingMother,
                };
                log::warn!(
                    "Skipping {} (father: {}, mother: {}) {} because the table is missing the {} genotype",
                    proband.sample_id(),
                    father_id,
                    mother_id,
                    variant_id,
                    match reason {
                        UnpairedReason::MissingParents => "father and mother",
                        UnpairedReason::MissingFather => "father",
                        _ => "mother",
                    }
                );
                grouping.unpaired.push(unpaired(reason));
            }
        }
    }
    grouping.num_families = families.len();

    log::debug!(
        "Paired {} rows into trios, {} left unpaired",
        format_number_with_commas(grouping.trios.len()),
        format_number_with_commas(grouping.unpaired.len())
    );
    grouping
}
