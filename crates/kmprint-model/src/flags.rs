//! Declaration flags
//!
//! Metadata encodes boolean declaration properties in a flag word whose bit
//! positions depend on the declaration kind. [`layout`] holds the per-kind bit
//! tables; [`FlagSet`] is the kind-independent result of decoding a word.

use serde::{Deserialize, Serialize};

/// Declaration kinds that carry their own flag layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagKind {
    Class,
    Constructor,
    Function,
    Property,
    PropertyAccessor,
    TypeAlias,
    Type,
    TypeParameter,
    ValueParameter,
}

/// Semantic flag names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Flag {
    // Common
    HasAnnotations,
    Internal,
    Private,
    Public,
    Protected,
    PrivateToThis,
    Local,
    Final,
    Open,
    Abstract,
    Sealed,
    HasVersionRequirement,
    RequiresOptIn,

    // Class
    UsualClass,
    Interface,
    EnumClass,
    EnumEntry,
    AnnotationClass,
    Object,
    CompanionObject,
    Inner,
    Data,
    Value,
    Fun,
    Expect,
    External,
    CompiledInCompatibilityMode,
    HasMethodBodiesInInterface,

    // Function and property
    Declaration,
    FakeOverride,
    Delegation,
    Synthesized,
    Operator,
    Infix,
    Inline,
    Tailrec,
    Suspend,
    Var,
    HasGetter,
    HasSetter,
    Const,
    Lateinit,
    HasConstant,
    Delegated,
    MovedFromInterfaceCompanion,

    // Accessor and constructor
    DefaultAccessor,
    Secondary,
    HasNonStableParameterNames,

    // Type, type parameter, value parameter
    Nullable,
    DefinitelyNonNull,
    Reified,
    HasDefaultValue,
    Crossinline,
    Noinline,
}

const COMMON: &[(Flag, u8)] = &[
    (Flag::HasAnnotations, 0),
    (Flag::Internal, 1),
    (Flag::Private, 2),
    (Flag::Public, 3),
    (Flag::Protected, 4),
    (Flag::PrivateToThis, 5),
    (Flag::Local, 6),
    (Flag::Final, 7),
    (Flag::Open, 8),
    (Flag::Abstract, 9),
    (Flag::Sealed, 10),
    (Flag::HasVersionRequirement, 11),
    (Flag::RequiresOptIn, 12),
];

const CLASS: &[(Flag, u8)] = &[
    (Flag::UsualClass, 16),
    (Flag::Interface, 17),
    (Flag::EnumClass, 18),
    (Flag::EnumEntry, 19),
    (Flag::AnnotationClass, 20),
    (Flag::Object, 21),
    (Flag::CompanionObject, 22),
    (Flag::Inner, 23),
    (Flag::Data, 24),
    (Flag::Value, 25),
    (Flag::Fun, 26),
    (Flag::Expect, 27),
    (Flag::External, 28),
    (Flag::CompiledInCompatibilityMode, 29),
    (Flag::HasMethodBodiesInInterface, 30),
];

const FUNCTION: &[(Flag, u8)] = &[
    (Flag::Declaration, 16),
    (Flag::FakeOverride, 17),
    (Flag::Delegation, 18),
    (Flag::Synthesized, 19),
    (Flag::Operator, 20),
    (Flag::Infix, 21),
    (Flag::Inline, 22),
    (Flag::Tailrec, 23),
    (Flag::External, 24),
    (Flag::Suspend, 25),
    (Flag::Expect, 26),
];

const PROPERTY: &[(Flag, u8)] = &[
    (Flag::Declaration, 16),
    (Flag::FakeOverride, 17),
    (Flag::Delegation, 18),
    (Flag::Synthesized, 19),
    (Flag::Var, 20),
    (Flag::HasGetter, 21),
    (Flag::HasSetter, 22),
    (Flag::Const, 23),
    (Flag::Lateinit, 24),
    (Flag::HasConstant, 25),
    (Flag::External, 26),
    (Flag::Delegated, 27),
    (Flag::Expect, 28),
    (Flag::MovedFromInterfaceCompanion, 29),
];

const ACCESSOR: &[(Flag, u8)] = &[
    (Flag::DefaultAccessor, 16),
    (Flag::External, 17),
    (Flag::Inline, 18),
];

const CONSTRUCTOR: &[(Flag, u8)] = &[
    (Flag::Secondary, 16),
    (Flag::HasNonStableParameterNames, 17),
];

const TYPE: &[(Flag, u8)] = &[
    (Flag::Nullable, 0),
    (Flag::Suspend, 1),
    (Flag::DefinitelyNonNull, 2),
];

const TYPE_PARAMETER: &[(Flag, u8)] = &[(Flag::Reified, 0)];

const VALUE_PARAMETER: &[(Flag, u8)] = &[
    (Flag::HasAnnotations, 0),
    (Flag::HasDefaultValue, 1),
    (Flag::Crossinline, 2),
    (Flag::Noinline, 3),
];

/// Bit positions for `kind`: the common declaration bits (where the kind
/// has them) followed by the kind-specific bits.
pub fn layout(kind: FlagKind) -> impl Iterator<Item = (Flag, u8)> {
    let (common, specific): (&'static [(Flag, u8)], &'static [(Flag, u8)]) = match kind {
        FlagKind::Class => (COMMON, CLASS),
        FlagKind::Function => (COMMON, FUNCTION),
        FlagKind::Property => (COMMON, PROPERTY),
        FlagKind::PropertyAccessor => (COMMON, ACCESSOR),
        FlagKind::Constructor => (COMMON, CONSTRUCTOR),
        FlagKind::TypeAlias => (COMMON, &[]),
        FlagKind::Type => (&[], TYPE),
        FlagKind::TypeParameter => (&[], TYPE_PARAMETER),
        FlagKind::ValueParameter => (&[], VALUE_PARAMETER),
    };
    common.iter().chain(specific.iter()).copied()
}

/// Set of decoded flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FlagSet(u64);

impl FlagSet {
    pub const EMPTY: FlagSet = FlagSet(0);

    /// Decode a raw flag word using the bit layout of `kind`
    pub fn from_word(word: u32, kind: FlagKind) -> Self {
        layout(kind)
            .filter(|(_, bit)| word & (1u32 << bit) != 0)
            .map(|(flag, _)| flag)
            .collect()
    }

    /// Encode back into the word layout of `kind`; flags foreign to the kind are dropped
    pub fn to_word(self, kind: FlagKind) -> u32 {
        layout(kind)
            .filter(|(flag, _)| self.contains(*flag))
            .fold(0, |word, (_, bit)| word | (1u32 << bit))
    }

    pub fn contains(self, flag: Flag) -> bool {
        self.0 & (1u64 << flag as u8) != 0
    }

    pub fn insert(&mut self, flag: Flag) {
        self.0 |= 1u64 << flag as u8;
    }

    pub fn with(mut self, flag: Flag) -> Self {
        self.insert(flag);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut set = FlagSet::EMPTY;
        for flag in iter {
            set.insert(flag);
        }
        set
    }
}

/// Flags as handed over by a decoder: either the raw word or the flag names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFlags {
    Word(u32),
    Names(Vec<Flag>),
}

impl Default for RawFlags {
    fn default() -> Self {
        RawFlags::Word(0)
    }
}

impl RawFlags {
    /// Resolve against the layout of `kind`
    pub fn resolve(&self, kind: FlagKind) -> FlagSet {
        match self {
            RawFlags::Word(word) => FlagSet::from_word(*word, kind),
            RawFlags::Names(names) => names.iter().copied().collect(),
        }
    }
}

impl From<&[Flag]> for RawFlags {
    fn from(flags: &[Flag]) -> Self {
        RawFlags::Names(flags.to_vec())
    }
}
