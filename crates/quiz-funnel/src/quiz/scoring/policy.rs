use super::config::PersonaBands;
use crate::quiz::domain::Summary;
use crate::quiz::persona::PersonaId;

/// Priority-ordered decision table; the first matching band wins.
pub(crate) fn fallback_persona(summary: &Summary, bands: &PersonaBands) -> PersonaId {
    let total = u64::from(summary.total_score) * 100;
    let max = u64::from(summary.max_total);

    if total >= max * u64::from(bands.all_rounder_percent) {
        return PersonaId::AllRounder;
    }

    if total >= max * u64::from(bands.polished_percent) {
        return PersonaId::Polished;
    }

    if total <= max * u64::from(bands.rebuild_percent) {
        return PersonaId::Rebuilder;
    }

    PersonaId::Balanced
}
