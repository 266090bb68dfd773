//! Flag interpreter
//!
//! Maps a decoded flag set to ordered keyword modifiers and to synthetic
//! annotations for flags that have no keyword form. Each declaration kind has
//! a static rule table; the table order is the emission order. Contradictory
//! flag combinations are rendered as given.

use kmprint_model::flags::{Flag, FlagKind, FlagSet};
use kmprint_model::raw::RawOptIn;
use kmprint_model::tree::{Annotation, AnnotationStyle, AnnotationValue, Modifier, ModifierSet};
use kmprint_model::VersionTag;

use crate::policy::PolicySet;

/// One row of a rule table
#[derive(Debug, Clone, Copy)]
pub struct FlagRule {
    pub flag: Flag,
    /// Emitted when the flag is set
    pub set: Option<Modifier>,
    /// Emitted when the flag is clear
    pub unset: Option<Modifier>,
    /// Rule is skipped when this flag is set
    pub unless: Option<Flag>,
}

const fn on(flag: Flag, modifier: Modifier) -> FlagRule {
    FlagRule {
        flag,
        set: Some(modifier),
        unset: None,
        unless: None,
    }
}

const VISIBILITY: [FlagRule; 3] = [
    on(Flag::Internal, Modifier::Internal),
    on(Flag::Private, Modifier::Private),
    on(Flag::Protected, Modifier::Protected),
];

const MODALITY: [FlagRule; 3] = [
    on(Flag::Open, Modifier::Open),
    on(Flag::Abstract, Modifier::Abstract),
    on(Flag::Sealed, Modifier::Sealed),
];

static CLASS_RULES: &[FlagRule] = &[
    VISIBILITY[0],
    VISIBILITY[1],
    VISIBILITY[2],
    MODALITY[0],
    FlagRule {
        unless: Some(Flag::Interface),
        ..MODALITY[1]
    },
    MODALITY[2],
    on(Flag::AnnotationClass, Modifier::AnnotationClass),
    on(Flag::Inner, Modifier::Inner),
    on(Flag::Data, Modifier::Data),
    on(Flag::Value, Modifier::Value),
    on(Flag::UsualClass, Modifier::Class),
    on(Flag::Fun, Modifier::Fun),
    on(Flag::Interface, Modifier::Interface),
    on(Flag::Object, Modifier::Object),
    on(Flag::Expect, Modifier::Expect),
    on(Flag::External, Modifier::External),
    on(Flag::CompanionObject, Modifier::CompanionObject),
    on(Flag::EnumEntry, Modifier::EnumEntry),
    on(Flag::EnumClass, Modifier::EnumClass),
    on(Flag::CompiledInCompatibilityMode, Modifier::CompiledInCompatibilityMode),
    on(Flag::HasMethodBodiesInInterface, Modifier::HasMethodBodiesInInterface),
];

static FUNCTION_RULES: &[FlagRule] = &[
    VISIBILITY[0],
    VISIBILITY[1],
    VISIBILITY[2],
    MODALITY[0],
    MODALITY[1],
    MODALITY[2],
    on(Flag::FakeOverride, Modifier::FakeOverride),
    on(Flag::Delegation, Modifier::Delegation),
    on(Flag::Synthesized, Modifier::Synthetic),
    on(Flag::Inline, Modifier::Inline),
    on(Flag::Infix, Modifier::Infix),
    on(Flag::Operator, Modifier::Operator),
    on(Flag::Tailrec, Modifier::Tailrec),
    on(Flag::External, Modifier::External),
    on(Flag::Suspend, Modifier::Suspend),
    on(Flag::Expect, Modifier::Expect),
];

static PROPERTY_RULES: &[FlagRule] = &[
    VISIBILITY[0],
    VISIBILITY[1],
    VISIBILITY[2],
    MODALITY[0],
    MODALITY[1],
    MODALITY[2],
    on(Flag::FakeOverride, Modifier::FakeOverride),
    on(Flag::Delegation, Modifier::Delegation),
    on(Flag::Synthesized, Modifier::Synthetic),
    FlagRule {
        flag: Flag::Var,
        set: Some(Modifier::Var),
        unset: Some(Modifier::Val),
        unless: None,
    },
    on(Flag::Const, Modifier::Const),
    on(Flag::Lateinit, Modifier::Lateinit),
    on(Flag::External, Modifier::External),
    on(Flag::Delegated, Modifier::Delegated),
    on(Flag::Expect, Modifier::Expect),
    on(Flag::MovedFromInterfaceCompanion, Modifier::MovedFromInterfaceCompanion),
];

static ACCESSOR_RULES: &[FlagRule] = &[
    VISIBILITY[0],
    VISIBILITY[1],
    VISIBILITY[2],
    MODALITY[0],
    MODALITY[1],
    MODALITY[2],
    on(Flag::External, Modifier::External),
    on(Flag::Inline, Modifier::Inline),
];

static TYPE_RULES: &[FlagRule] = &[on(Flag::Suspend, Modifier::Suspend)];

static TYPE_PARAMETER_RULES: &[FlagRule] = &[on(Flag::Reified, Modifier::Reified)];

static VALUE_PARAMETER_RULES: &[FlagRule] = &[
    on(Flag::Crossinline, Modifier::Crossinline),
    on(Flag::Noinline, Modifier::Noinline),
];

/// Rule table for `kind`. Constructors and type aliases print no keyword modifiers.
pub fn rules(kind: FlagKind) -> &'static [FlagRule] {
    match kind {
        FlagKind::Class => CLASS_RULES,
        FlagKind::Function => FUNCTION_RULES,
        FlagKind::Property => PROPERTY_RULES,
        FlagKind::PropertyAccessor => ACCESSOR_RULES,
        FlagKind::Type => TYPE_RULES,
        FlagKind::TypeParameter => TYPE_PARAMETER_RULES,
        FlagKind::ValueParameter => VALUE_PARAMETER_RULES,
        FlagKind::Constructor | FlagKind::TypeAlias => &[],
    }
}

/// Data some synthetic annotations are built from
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<'a> {
    pub version_requirements: &'a [VersionTag],
    pub opt_in: Option<&'a RawOptIn>,
}

/// Result of interpreting one flag set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    pub modifiers: ModifierSet,
    /// Synthetic annotations, in emission order
    pub annotations: Vec<Annotation>,
}

/// Interpret `flags` for a declaration of `kind`
pub fn interpret(flags: FlagSet, kind: FlagKind, policy: &PolicySet, payload: &Payload<'_>) -> Interpretation {
    Interpretation {
        modifiers: modifiers(flags, kind),
        annotations: synthetic_annotations(flags, policy, payload),
    }
}

/// Keyword modifiers only
pub fn modifiers(flags: FlagSet, kind: FlagKind) -> ModifierSet {
    let mut set = ModifierSet::default();
    for rule in rules(kind) {
        if rule.unless.is_some_and(|flag| flags.contains(flag)) {
            continue;
        }
        let modifier = if flags.contains(rule.flag) { rule.set } else { rule.unset };
        if let Some(modifier) = modifier {
            set.push(modifier);
        }
    }
    set
}

fn synthetic_annotations(flags: FlagSet, policy: &PolicySet, payload: &Payload<'_>) -> Vec<Annotation> {
    let mut annotations = Vec::new();

    if flags.contains(Flag::RequiresOptIn) {
        let mut annotation = Annotation::new("RequiresOptIn", AnnotationStyle::Jvm);
        if let Some(opt_in) = payload.opt_in {
            if let Some(message) = &opt_in.message {
                annotation = annotation.with_argument("message", AnnotationValue::Str(message.clone()));
            }
            if let Some(level) = &opt_in.level {
                annotation = annotation.with_argument(
                    "level",
                    AnnotationValue::Enum {
                        class: "RequiresOptIn.Level".to_string(),
                        entry: level.clone(),
                    },
                );
            }
        }
        annotations.push(annotation);
    }

    if flags.contains(Flag::HasVersionRequirement) && policy.emit_version_hint {
        annotations.extend(payload.version_requirements.iter().map(|requirement| {
            Annotation::new("SinceKotlin", AnnotationStyle::Jvm)
                .with_argument("value", AnnotationValue::Str(requirement.to_string()))
        }));
    }

    annotations
}
