/// Closed set of trigger condition kinds.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TriggerKind {
    /// Placeholder for unset data; never satisfied.
    #[default]
    Unspecified,
    OnMiss,
    OnNormalHit,
    OnComboHit,
    OnCriticalHit,
    OnExactRollValue,
    SameActionUsedPreviously,
    DifferentActionUsedPreviously,
    ActionHasTag,
    GearHasTag,
    TargetHealthBelow,
    TargetHealthAbove,
    SourceHealthBelow,
    SourceHealthAbove,
    ComboPositionEquals,
    ComboLengthEquals,
}

/// A predicate attached to an action. Pure data.
///
/// Parameter fields only mean something for the kinds that read them; the
/// evaluator treats a missing parameter as "not satisfied".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TriggerCondition {
    pub kind: TriggerKind,
    /// Exact roll, health percent (0-100) or combo length.
    pub value: Option<i32>,
    pub tag: Option<String>,
    /// 1-based combo slot.
    pub combo_position: Option<usize>,
}

impl TriggerCondition {
    pub fn new(kind: TriggerKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_combo_position(mut self, position: usize) -> Self {
        self.combo_position = Some(position);
        self
    }

    pub fn on_miss() -> Self {
        Self::new(TriggerKind::OnMiss)
    }

    pub fn on_normal_hit() -> Self {
        Self::new(TriggerKind::OnNormalHit)
    }

    pub fn on_combo_hit() -> Self {
        Self::new(TriggerKind::OnComboHit)
    }

    pub fn on_critical_hit() -> Self {
        Self::new(TriggerKind::OnCriticalHit)
    }

    pub fn on_exact_roll(value: i32) -> Self {
        Self::new(TriggerKind::OnExactRollValue).with_value(value)
    }

    pub fn same_action_used_previously() -> Self {
        Self::new(TriggerKind::SameActionUsedPreviously)
    }

    pub fn different_action_used_previously() -> Self {
        Self::new(TriggerKind::DifferentActionUsedPreviously)
    }

    pub fn action_has_tag(tag: impl Into<String>) -> Self {
        Self::new(TriggerKind::ActionHasTag).with_tag(tag)
    }

    pub fn gear_has_tag(tag: impl Into<String>) -> Self {
        Self::new(TriggerKind::GearHasTag).with_tag(tag)
    }

    pub fn target_health_below(percent: i32) -> Self {
        Self::new(TriggerKind::TargetHealthBelow).with_value(percent)
    }

    pub fn target_health_above(percent: i32) -> Self {
        Self::new(TriggerKind::TargetHealthAbove).with_value(percent)
    }

    pub fn source_health_below(percent: i32) -> Self {
        Self::new(TriggerKind::SourceHealthBelow).with_value(percent)
    }

    pub fn source_health_above(percent: i32) -> Self {
        Self::new(TriggerKind::SourceHealthAbove).with_value(percent)
    }

    pub fn combo_position_equals(position: usize) -> Self {
        Self::new(TriggerKind::ComboPositionEquals).with_combo_position(position)
    }

    pub fn combo_length_equals(length: i32) -> Self {
        Self::new(TriggerKind::ComboLengthEquals).with_value(length)
    }
}
