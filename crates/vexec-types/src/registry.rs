use crate::error::TypeError;
use crate::long_time_with_time_zone::LongTimeWithTimeZoneType;
use std::sync::Arc;

/// One shared [`LongTimeWithTimeZoneType`] per supported precision.
///
/// Built once by the engine at startup and handed to whoever needs descriptors; lookups return
/// clones of the same `Arc`, so every caller observes the same instance for a precision.
#[derive(Debug, Clone)]
pub struct LongTimeWithTimeZoneTypes {
    types: Vec<Arc<LongTimeWithTimeZoneType>>,
}

impl LongTimeWithTimeZoneTypes {
    pub fn new() -> Result<Self, TypeError> {
        let types = (LongTimeWithTimeZoneType::MIN_PRECISION
            ..=LongTimeWithTimeZoneType::MAX_PRECISION)
            .map(|precision| LongTimeWithTimeZoneType::new(precision).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!(
            "registered {} long time with time zone types (precision {}..={})",
            types.len(),
            LongTimeWithTimeZoneType::MIN_PRECISION,
            LongTimeWithTimeZoneType::MAX_PRECISION
        );
        Ok(Self { types })
    }

    pub fn get(&self, precision: u32) -> Result<Arc<LongTimeWithTimeZoneType>, TypeError> {
        precision
            .checked_sub(LongTimeWithTimeZoneType::MIN_PRECISION)
            .and_then(|idx| self.types.get(idx as usize))
            .cloned()
            .ok_or(TypeError::InvalidPrecision {
                precision,
                min: LongTimeWithTimeZoneType::MIN_PRECISION,
                max: LongTimeWithTimeZoneType::MAX_PRECISION,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<LongTimeWithTimeZoneType>> {
        self.types.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Type;

    #[test]
    fn lookups_share_one_instance_per_precision() {
        let registry = LongTimeWithTimeZoneTypes::new().unwrap();
        assert_eq!(registry.iter().count(), 3);

        let a = registry.get(11).unwrap();
        let b = registry.get(11).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.precision(), 11);
        assert_eq!(a.display_name(), "time(11) with time zone");
    }

    #[test]
    fn unsupported_precisions_are_rejected() {
        let registry = LongTimeWithTimeZoneTypes::new().unwrap();
        for precision in [0, 9, 13, u32::MAX] {
            assert_eq!(
                registry.get(precision).unwrap_err(),
                TypeError::InvalidPrecision {
                    precision,
                    min: 10,
                    max: 12,
                }
            );
        }
    }
}
