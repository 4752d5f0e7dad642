use std::any::{type_name, TypeId};
use std::fmt;
use std::marker::PhantomData;

use strum_macros::{Display, EnumIter, IntoStaticStr};

/// A named event type carrying a payload of type `P`
///
/// Channels are plain values, so new event types are declared as constants
/// without any registration step. Two channels are the same channel when both
/// their name and payload type match; `Channel<()>` is the payload-less shape.
pub struct Channel<P> {
    name: &'static str,
    _payload: PhantomData<fn(&P)>,
}

impl<P> Channel<P> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _payload: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the payload type, for logging and stats
    pub fn payload_type_name(&self) -> &'static str {
        type_name::<P>()
    }
}

impl<P: 'static> Channel<P> {
    pub(crate) fn key(&self) -> ChannelKey {
        ChannelKey {
            name: self.name,
            payload: TypeId::of::<P>(),
        }
    }
}

// Manual impls: derives would put bounds on `P`
impl<P> Clone for Channel<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Channel<P> {}

impl<P> PartialEq for Channel<P> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<P> Eq for Channel<P> {}

impl<P> fmt::Debug for Channel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("payload", &type_name::<P>())
            .finish()
    }
}

impl<P> fmt::Display for Channel<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Map key identifying a channel inside the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ChannelKey {
    pub name: &'static str,
    pub payload: TypeId,
}

/// Raised without a payload, e.g. "something changed, go look"
pub const NO_INFORMATION: Channel<()> = Channel::new("no_information");

/// Raised when a UI button is pressed, carrying the button label
pub const BUTTON_PRESSED: Channel<String> = Channel::new("button_pressed");

/// Raised when the equipped armor changes, carrying the part name
pub const ARMOR_CHANGED: Channel<String> = Channel::new("armor_changed");

/// The channels every hub knows about from construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinChannel {
    NoInformation,
    ButtonPressed,
    ArmorChanged,
}

impl BuiltinChannel {
    /// Key and payload type name for this channel
    pub(crate) fn descriptor(self) -> (ChannelKey, &'static str) {
        match self {
            BuiltinChannel::NoInformation => {
                (NO_INFORMATION.key(), NO_INFORMATION.payload_type_name())
            }
            BuiltinChannel::ButtonPressed => {
                (BUTTON_PRESSED.key(), BUTTON_PRESSED.payload_type_name())
            }
            BuiltinChannel::ArmorChanged => {
                (ARMOR_CHANGED.key(), ARMOR_CHANGED.payload_type_name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_builtin_names_match_constants() {
        for builtin in BuiltinChannel::iter() {
            let (key, _) = builtin.descriptor();
            let name: &'static str = builtin.into();
            assert_eq!(key.name, name);
            assert_eq!(builtin.to_string(), name);
        }
    }

    #[test]
    fn test_same_name_different_payload_is_different_key() {
        let as_string: Channel<String> = Channel::new("score");
        let as_number: Channel<u32> = Channel::new("score");

        assert_eq!(as_string.name(), as_number.name());
        assert_ne!(as_string.key(), as_number.key());
    }

    #[test]
    fn test_string_channels_are_distinct() {
        // Same payload shape, different channels
        assert_ne!(BUTTON_PRESSED.key(), ARMOR_CHANGED.key());
        assert_eq!(BUTTON_PRESSED.payload_type_name(), ARMOR_CHANGED.payload_type_name());
    }

    #[test]
    fn test_channel_is_copy_without_payload_bounds() {
        struct NotClone;
        let channel: Channel<NotClone> = Channel::new("opaque");
        let copy = channel;

        assert_eq!(channel, copy);
        assert_eq!(format!("{}", copy), "opaque");
    }
}
