//! Address-space accounting for load and store instructions.
//!
//! The numbering follows the kernel compilation setup: private memory is the
//! default address space, `__local` is mapped to 1 and `__global` to 2.

use super::aggregator::FeatureAggregator;
use std::fmt;

pub const PRIVATE_ADDRESS_SPACE: u32 = 0;
pub const LOCAL_ADDRESS_SPACE: u32 = 1;
pub const GLOBAL_ADDRESS_SPACE: u32 = 2;

/// Memory region targeted by a memory instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressSpace {
    Private,
    Local,
    Global,
    Unrecognized(u32),
}

impl AddressSpace {
    pub fn from_id(id: u32) -> Self {
        match id {
            PRIVATE_ADDRESS_SPACE => AddressSpace::Private,
            LOCAL_ADDRESS_SPACE => AddressSpace::Local,
            GLOBAL_ADDRESS_SPACE => AddressSpace::Global,
            other => AddressSpace::Unrecognized(other),
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, AddressSpace::Unrecognized(_))
    }
}

impl fmt::Display for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressSpace::Private => write!(f, "private"),
            AddressSpace::Local => write!(f, "local"),
            AddressSpace::Global => write!(f, "global"),
            AddressSpace::Unrecognized(id) => write!(f, "unrecognized({id})"),
        }
    }
}

/// Record the address space of a load or store that was already counted.
///
/// Unknown ids bump the warning counter and the run goes on. The caller owns
/// the instruction, so it is the one that logs the warning (see
/// [`unhandled_address_space_message`]).
pub fn account(address_space_id: u32, aggregator: &mut FeatureAggregator) -> AddressSpace {
    let space = AddressSpace::from_id(address_space_id);
    if let AddressSpace::Unrecognized(id) = space {
        log::debug!("Counting unhandled address space id {id}");
    }
    aggregator.observe_address_space(space);
    space
}

/// Warning text for a load or store in an unrecognized address space.
pub fn unhandled_address_space_message(address_space_id: u32, inst: &str) -> String {
    format!("unhandled address space id {address_space_id} in: {inst}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::classifier::{Category, Classification};

    #[test]
    fn test_known_ids() {
        assert_eq!(AddressSpace::from_id(0), AddressSpace::Private);
        assert_eq!(AddressSpace::from_id(1), AddressSpace::Local);
        assert_eq!(AddressSpace::from_id(2), AddressSpace::Global);
        assert_eq!(AddressSpace::from_id(5), AddressSpace::Unrecognized(5));
        assert!(!AddressSpace::from_id(3).is_recognized());
    }

    #[test]
    fn test_account_increments_exactly_one_counter() {
        for id in [0u32, 1, 2, 3, 5, 42] {
            let mut agg = FeatureAggregator::new();
            account(id, &mut agg);
            let s = agg.partial_snapshot();
            let touched = s.private_mem_accesses
                + s.local_mem_accesses
                + s.global_mem_accesses
                + s.unrecognized_address_spaces;
            assert_eq!(touched, 1, "address space {id}");
        }
    }

    #[test]
    fn test_unrecognized_is_counted_not_dropped() {
        let mut agg = FeatureAggregator::new();
        agg.observe_instruction(Classification {
            category: Category::Store,
            float_op: None,
        });
        let space = account(5, &mut agg);
        assert_eq!(space, AddressSpace::Unrecognized(5));
        let s = agg.finalize();
        assert_eq!(s.unrecognized_address_spaces, 1);
        assert_eq!(s.private_mem_accesses + s.local_mem_accesses + s.global_mem_accesses, 0);
    }

    #[test]
    fn test_unhandled_message_names_id_and_instruction() {
        assert_eq!(
            unhandled_address_space_message(5, "store addrspace(5) %v, %p"),
            "unhandled address space id 5 in: store addrspace(5) %v, %p"
        );
        assert!(!unhandled_address_space_message(3, "load").starts_with("WARNING"));
    }

    #[test]
    fn test_display() {
        assert_eq!(AddressSpace::Local.to_string(), "local");
        assert_eq!(AddressSpace::Unrecognized(7).to_string(), "unrecognized(7)");
    }
}
