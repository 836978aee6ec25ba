// src/core/state.rs

use crate::core::constants::solver::MAX_STATE_SPACE;
use crate::core::QdotError;
use std::fmt;

/// Electron occupation of every dot in an array, e.g. `(1, 0)` for one
/// electron on the left dot of a double dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChargeConfiguration {
    occupations: Vec<u32>,
}

impl ChargeConfiguration {
    /// Creates a configuration from per-dot occupation numbers.
    pub fn new(occupations: Vec<u32>) -> Self {
        Self { occupations }
    }

    /// Per-dot occupation numbers, in dot order.
    pub fn occupations(&self) -> &[u32] {
        &self.occupations
    }

    /// Occupation of a single dot, or `None` if the index is out of range.
    pub fn occupation(&self, dot: usize) -> Option<u32> {
        self.occupations.get(dot).copied()
    }

    /// Number of dots described.
    pub fn num_dots(&self) -> usize {
        self.occupations.len()
    }

    /// Total number of electrons in the array. This is what a charge sensor
    /// coupled equally to all dots responds to.
    pub fn total_charge(&self) -> u32 {
        self.occupations.iter().sum()
    }
}

impl fmt::Display for ChargeConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, n) in self.occupations.iter().enumerate() {
            write!(f, "{}{}", if i > 0 { ", " } else { "" }, n)?;
        }
        write!(f, ")")
    }
}

/// The ordered, immutable set of configurations a device model may occupy.
///
/// Every dot ranges over `0..=max_occupation`; configurations are listed in
/// lexicographic order with the first dot varying slowest. The order matters:
/// the ground-state solver breaks exact energy ties in favour of the earlier
/// entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSpace {
    configurations: Vec<ChargeConfiguration>,
    num_dots: usize,
}

impl StateSpace {
    /// Enumerates the full Cartesian product `{0..=max_occupation}^num_dots`.
    ///
    /// # Returns
    /// * `Err(QdotError::InvalidArgument)` if the product has more than
    ///   `MAX_STATE_SPACE` configurations (or does not fit in `usize`).
    pub fn enumerate(num_dots: usize, max_occupation: u32) -> Result<Self, QdotError> {
        let size = usize::try_from(max_occupation)
            .ok()
            .and_then(|m| m.checked_add(1))
            .zip(u32::try_from(num_dots).ok())
            .and_then(|(levels, exp)| levels.checked_pow(exp))
            .filter(|&size| size <= MAX_STATE_SPACE)
            .ok_or_else(|| {
                QdotError::invalid_argument(format!(
                    "{} dots with occupations 0..={} exceed the {} configuration limit",
                    num_dots, max_occupation, MAX_STATE_SPACE
                ))
            })?;
        Ok(Self::build(num_dots, max_occupation as usize + 1, size))
    }

    /// Enumeration for the built-in devices, whose dot counts and occupation
    /// limits are compile-time constants far below `MAX_STATE_SPACE`.
    pub(crate) fn enumerate_fixed(num_dots: usize, max_occupation: u32) -> Self {
        let levels = max_occupation as usize + 1;
        Self::build(num_dots, levels, levels.pow(num_dots as u32))
    }

    fn build(num_dots: usize, levels: usize, size: usize) -> Self {
        let mut configurations = Vec::with_capacity(size);
        for index in 0..size {
            // Decode `index` as a base-`levels` number, most significant digit first.
            let mut occupations = vec![0u32; num_dots];
            let mut rest = index;
            for slot in occupations.iter_mut().rev() {
                *slot = (rest % levels) as u32;
                rest /= levels;
            }
            configurations.push(ChargeConfiguration::new(occupations));
        }
        Self { configurations, num_dots }
    }

    /// Number of configurations.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// True only for a space with no configurations, which `enumerate` never builds.
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Number of dots per configuration.
    pub fn num_dots(&self) -> usize {
        self.num_dots
    }

    /// All configurations in enumeration order.
    pub fn configurations(&self) -> &[ChargeConfiguration] {
        &self.configurations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChargeConfiguration> {
        self.configurations.iter()
    }
}

impl<'a> IntoIterator for &'a StateSpace {
    type Item = &'a ChargeConfiguration;
    type IntoIter = std::slice::Iter<'a, ChargeConfiguration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_dot_space_order() {
        let space = StateSpace::enumerate(2, 3).expect("small space");
        assert_eq!(space.len(), 16);
        assert_eq!(space.configurations()[0].occupations(), &[0, 0]);
        assert_eq!(space.configurations()[1].occupations(), &[0, 1]);
        assert_eq!(space.configurations()[4].occupations(), &[1, 0]);
        assert_eq!(space.configurations()[15].occupations(), &[3, 3]);
    }

    #[test]
    fn test_triple_dot_space_is_complete() {
        let space = StateSpace::enumerate(3, 2).expect("small space");
        assert_eq!(space.len(), 27);
        let mut seen: Vec<&ChargeConfiguration> = space.iter().collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 27, "Every configuration should appear exactly once");
        assert!(space.iter().all(|c| c.occupations().iter().all(|&n| n <= 2)));
    }

    #[test]
    fn test_configuration_display_and_charge() {
        let config = ChargeConfiguration::new(vec![1, 0, 2]);
        assert_eq!(config.to_string(), "(1, 0, 2)");
        assert_eq!(config.total_charge(), 3);
        assert_eq!(config.occupation(2), Some(2));
        assert_eq!(config.occupation(3), None);
    }

    #[test]
    fn test_oversized_space_is_rejected() {
        // 4^40 overflows usize; 4^12 fits in usize but exceeds the configuration limit.
        assert!(matches!(StateSpace::enumerate(40, 3), Err(QdotError::InvalidArgument { .. })));
        assert!(matches!(StateSpace::enumerate(12, 3), Err(QdotError::InvalidArgument { .. })));
        assert!(matches!(StateSpace::enumerate(2, u32::MAX), Err(QdotError::InvalidArgument { .. })));
        assert_eq!(StateSpace::enumerate(10, 1).map(|s| s.len()), Ok(1024));
    }

    #[test]
    fn test_fixed_enumeration_matches_checked() {
        assert_eq!(StateSpace::enumerate_fixed(3, 2), StateSpace::enumerate(3, 2).expect("small space"));
    }
}
