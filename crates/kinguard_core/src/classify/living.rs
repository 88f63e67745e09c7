//! Living classifier.
//!
//! Only consulted for people the death classifier did not decide. Rules,
//! first match wins:
//! 1. no events at all: a "Living" placeholder name without old relatives;
//! 2. own events: living marker, birth-like event under 110 years, or a death
//!    recorded as `n`;
//! 3. spouse-of families: private/recent marriage, young co-spouse, young
//!    child;
//! 4. child-of families: private/recent parents' marriage, young parent,
//!    young sibling.

use super::{
    has_living_evidence, has_old_birth, lookup_family, lookup_member, FamilyRole,
    DEAD_IF_MARRIED, DEAD_IF_OLDER_THAN, LIVING_IF_CHILD_YOUNGER_THAN,
    LIVING_IF_PARENTS_MARRIED, LIVING_IF_PARENTS_YOUNGER_THAN, LIVING_IF_SIBLING_YOUNGER_THAN,
    LIVING_IF_SPOUSE_YOUNGER_THAN,
};
use crate::dates::AgeClock;
use crate::diagnostics::Diagnostics;
use crate::model::family::Family;
use crate::model::graph::RecordGraph;
use crate::model::person::{Person, PersonId};

/// Ages (spouses, children) that make a family member "old" when looked at
/// from a child of the family.
const OLD_PARENT_FAMILY: OldMemberThresholds = OldMemberThresholds {
    spouse_years: DEAD_IF_OLDER_THAN + 70,
    child_years: DEAD_IF_OLDER_THAN + 50,
};
/// Ages (spouses, children) that make a family member "old" when looked at
/// from a spouse of the family.
const OLD_SPOUSE_FAMILY: OldMemberThresholds = OldMemberThresholds {
    spouse_years: DEAD_IF_OLDER_THAN + 50,
    child_years: DEAD_IF_OLDER_THAN - 20,
};

#[derive(Debug, Clone, Copy)]
struct OldMemberThresholds {
    spouse_years: i64,
    child_years: i64,
}

/// Household scan thresholds for one family role.
#[derive(Debug, Clone, Copy)]
struct HouseholdThresholds {
    marriage_years: i64,
    spouse_years: i64,
    child_years: i64,
}

const AS_SPOUSE: HouseholdThresholds = HouseholdThresholds {
    marriage_years: DEAD_IF_MARRIED,
    spouse_years: LIVING_IF_SPOUSE_YOUNGER_THAN,
    child_years: LIVING_IF_CHILD_YOUNGER_THAN,
};

const AS_CHILD: HouseholdThresholds = HouseholdThresholds {
    marriage_years: LIVING_IF_PARENTS_MARRIED,
    spouse_years: LIVING_IF_PARENTS_YOUNGER_THAN,
    child_years: LIVING_IF_SIBLING_YOUNGER_THAN,
};

pub fn is_definitely_living(
    graph: &RecordGraph,
    clock: &AgeClock,
    person: &Person,
    diagnostics: &mut Diagnostics,
) -> bool {
    if person.events.is_empty() {
        let named_living = person
            .name
            .as_ref()
            .is_some_and(|name| name.is_living_placeholder());
        if named_living && !has_old_relatives(graph, clock, person, diagnostics) {
            return true;
        }
    } else if has_living_evidence(clock, &person.events, DEAD_IF_OLDER_THAN) {
        return true;
    }

    for family_id in person.spouse_of_families() {
        let Some(family) = lookup_family(
            graph,
            &person.id,
            family_id,
            FamilyRole::Spouse,
            diagnostics,
        ) else {
            continue;
        };
        let skip = Some(&person.id);
        if household_suggests_living(graph, clock, family, skip, AS_SPOUSE, diagnostics) {
            return true;
        }
    }

    for family_id in person.child_of_families() {
        let Some(family) = lookup_family(
            graph,
            &person.id,
            family_id,
            FamilyRole::Child,
            diagnostics,
        ) else {
            continue;
        };
        if household_suggests_living(graph, clock, family, None, AS_CHILD, diagnostics) {
            return true;
        }
    }

    false
}

/// True when a parent family or a spouse family holds someone whose birth is
/// old enough to rule out a living placeholder.
pub fn has_old_relatives(
    graph: &RecordGraph,
    clock: &AgeClock,
    person: &Person,
    diagnostics: &mut Diagnostics,
) -> bool {
    for family_id in person.child_of_families() {
        if let Some(family) = lookup_family(
            graph,
            &person.id,
            family_id,
            FamilyRole::Child,
            diagnostics,
        ) {
            if has_old_member(graph, clock, family, OLD_PARENT_FAMILY, diagnostics) {
                return true;
            }
        }
    }
    for family_id in person.spouse_of_families() {
        if let Some(family) = lookup_family(
            graph,
            &person.id,
            family_id,
            FamilyRole::Spouse,
            diagnostics,
        ) {
            if has_old_member(graph, clock, family, OLD_SPOUSE_FAMILY, diagnostics) {
                return true;
            }
        }
    }
    false
}

fn has_old_member(
    graph: &RecordGraph,
    clock: &AgeClock,
    family: &Family,
    thresholds: OldMemberThresholds,
    diagnostics: &mut Diagnostics,
) -> bool {
    for spouse_id in family.spouses() {
        if let Some(spouse) = lookup_member(
            graph,
            &family.id,
            spouse_id,
            FamilyRole::Spouse,
            diagnostics,
        ) {
            if has_old_birth(clock, &spouse.events, thresholds.spouse_years) {
                return true;
            }
        }
    }
    for child_id in family.child_ids() {
        if let Some(child) = lookup_member(
            graph,
            &family.id,
            child_id,
            FamilyRole::Child,
            diagnostics,
        ) {
            if has_old_birth(clock, &child.events, thresholds.child_years) {
                return true;
            }
        }
    }
    false
}

fn household_suggests_living(
    graph: &RecordGraph,
    clock: &AgeClock,
    family: &Family,
    skip_spouse: Option<&PersonId>,
    thresholds: HouseholdThresholds,
    diagnostics: &mut Diagnostics,
) -> bool {
    let recent_marriage = family.events.iter().any(|event| {
        event.kind.is_marriage()
            && event.normalized_date().is_some_and(|date| {
                date == "private"
                    || date == "living"
                    || clock.age_is_less_than(event, thresholds.marriage_years)
            })
    });
    if recent_marriage {
        return true;
    }

    for spouse_id in family.spouses() {
        if skip_spouse == Some(spouse_id) {
            continue;
        }
        if let Some(spouse) = lookup_member(
            graph,
            &family.id,
            spouse_id,
            FamilyRole::Spouse,
            diagnostics,
        ) {
            if has_living_evidence(clock, &spouse.events, thresholds.spouse_years) {
                return true;
            }
        }
    }

    for child_id in family.child_ids() {
        if let Some(child) = lookup_member(
            graph,
            &family.id,
            child_id,
            FamilyRole::Child,
            diagnostics,
        ) {
            if has_living_evidence(clock, &child.events, thresholds.child_years) {
                return true;
            }
        }
    }

    false
}
