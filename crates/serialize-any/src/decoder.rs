//! Recursive decoder: mirrors the encoder, deserializing top-down and then
//! recursing into children.
//!
//! A serialized form is first turned back into its live container (its
//! discriminator changes from the `_Serialized` tag to the live type's
//! tag), then the live container's children are restored in place.

use crate::classify::classify;
use crate::constants::DEFAULT_MAX_DEPTH;
use crate::error::DecodeError;
use crate::registry::Registry;
use crate::value::SaValue;

/// Caller-supplied resolution of custom constructor names the registry does
/// not know about. `resolve` returns a fresh instance onto which the
/// decoded property snapshot is copied, or `None` when the name cannot be
/// resolved at all.
pub trait Resolver {
    fn resolve(&self, constructor_name: &str) -> Option<SaValue>;
}

/// Context handed to every `deserialize` operation.
pub struct DecodeCtx<'a> {
    pub registry: &'a Registry,
    pub resolver: Option<&'a dyn Resolver>,
}

/// Recursive decoder over a registry.
pub struct SaDecoder<'a> {
    registry: &'a Registry,
    pub max_depth: u32,
}

impl<'a> SaDecoder<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(registry: &'a Registry, max_depth: u32) -> Self {
        Self {
            registry,
            max_depth,
        }
    }

    /// Decode a plain form back into a live value.
    pub fn decode(
        &self,
        plain: &SaValue,
        resolver: Option<&dyn Resolver>,
    ) -> Result<SaValue, DecodeError> {
        self.decode_at(plain.clone(), resolver, 0)
    }

    fn decode_at(
        &self,
        plain: SaValue,
        resolver: Option<&dyn Resolver>,
        depth: u32,
    ) -> Result<SaValue, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::DepthExceeded(self.max_depth));
        }
        let mut value = plain;
        let discriminator = classify(&value, self.registry);
        let mut entry = *self.registry.lookup(&discriminator);

        if let Some(deserialize) = entry.deserialize {
            let ctx = DecodeCtx {
                registry: self.registry,
                resolver,
            };
            value = deserialize(&value, &ctx)?;
            // The live result classifies differently from the wire form.
            let live = classify(&value, self.registry);
            entry = *self.registry.lookup(&live);
        }

        if let Some(iterate) = entry.iterate {
            for mut info in iterate(&value, self.registry) {
                let child_entry = self.registry.lookup(&info.type_name);
                if child_entry.iterate.is_none() && child_entry.deserialize.is_none() {
                    // Plain leaf; nothing to restore.
                    continue;
                }
                let child = std::mem::take(&mut info.value);
                info.value = self.decode_at(child, resolver, depth + 1)?;
                if let Some(set_value) = entry.set_value {
                    set_value(&mut value, info);
                }
            }
        }

        Ok(value)
    }
}
