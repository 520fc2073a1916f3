//! Depth-bounded recursive encoder.
//!
//! Walks a value depth-first, rewriting composite containers in place:
//! every child is fully encoded before the parent's own `serialize` runs,
//! because a parent's serialize may copy or restructure the container and
//! must operate on already-JSON-safe children.

use crate::classify::classify;
use crate::envelope::EncodeOptions;
use crate::error::EncodeError;
use crate::registry::Registry;
use crate::value::SaValue;

/// Recursive encoder over a registry. The registry is read-only during
/// encoding, so one encoder can be shared freely.
pub struct SaEncoder<'a> {
    registry: &'a Registry,
    pub options: EncodeOptions,
}

impl<'a> SaEncoder<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            options: EncodeOptions::default(),
        }
    }

    pub fn with_options(registry: &'a Registry, options: EncodeOptions) -> Self {
        Self { registry, options }
    }

    /// Encode a value into its JSON-safe plain form.
    pub fn encode(&self, value: &SaValue) -> Result<SaValue, EncodeError> {
        self.encode_at(value.clone(), 0)
    }

    fn encode_at(&self, mut value: SaValue, depth: u32) -> Result<SaValue, EncodeError> {
        if depth > self.options.max_depth {
            return Err(EncodeError::DepthExceeded(self.options.max_depth));
        }
        let discriminator = classify(&value, self.registry);
        let entry = *self.registry.lookup(&discriminator);
        // A non-plain value whose bundle cannot produce a wire form (its
        // capability is disabled) must fail loudly, never degrade to null.
        if entry.serialize.is_none() && entry.iterate.is_none() && !value.is_plain() {
            return Err(EncodeError::UnsupportedType(discriminator));
        }

        if let Some(iterate) = entry.iterate {
            for mut info in iterate(&value, self.registry) {
                let child_entry = self.registry.lookup(&info.type_name);
                if child_entry.iterate.is_some() {
                    // Composite child: encode the whole subtree first.
                    let child = std::mem::take(&mut info.value);
                    info.value = self.encode_at(child, depth + 1)?;
                } else if let Some(serialize) = child_entry.serialize {
                    info.value = serialize(&info.value)?;
                } else if !info.value.is_plain() {
                    return Err(EncodeError::UnsupportedType(info.type_name));
                } else {
                    // Already JSON-safe; leave untouched.
                    continue;
                }
                if let Some(set_value) = entry.set_value {
                    set_value(&mut value, info);
                }
            }
        }

        match entry.serialize {
            Some(serialize) => serialize(&value),
            None => Ok(value),
        }
    }
}
