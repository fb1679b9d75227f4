//! Equipped gear.
//!
//! Gear matters to the rules only through its tags: gear-tag trigger
//! conditions inspect the weapon, head, body and feet slots.

/// Equipment slot.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GearSlot {
    Weapon,
    Head,
    Body,
    Feet,
}

/// A piece of equipped gear. Tags are stored lowercase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GearItem {
    pub name: String,
    tags: Vec<String>,
}

impl GearItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
        }
    }

    /// Builder: add a tag.
    pub fn tag(mut self, tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().to_lowercase();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Case-insensitive tag lookup.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Gear currently equipped by an actor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Option<GearItem>,
    pub head: Option<GearItem>,
    pub body: Option<GearItem>,
    pub feet: Option<GearItem>,
}

impl Equipment {
    /// Creates empty equipment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a builder for constructing equipment.
    pub fn builder() -> EquipmentBuilder {
        EquipmentBuilder::default()
    }

    pub fn get(&self, slot: GearSlot) -> Option<&GearItem> {
        self.slot(slot).as_ref()
    }

    /// Equips an item, returning whatever was in the slot before.
    pub fn equip(&mut self, slot: GearSlot, item: GearItem) -> Option<GearItem> {
        self.slot_mut(slot).replace(item)
    }

    /// Empties a slot, returning its item if any was equipped.
    pub fn unequip(&mut self, slot: GearSlot) -> Option<GearItem> {
        self.slot_mut(slot).take()
    }

    /// Iterates over equipped items in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (GearSlot, &GearItem)> + '_ {
        use strum::IntoEnumIterator;
        GearSlot::iter().filter_map(|slot| self.get(slot).map(|item| (slot, item)))
    }

    /// True if any equipped item carries `tag`. Empty slots never match.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.iter().any(|(_, item)| item.has_tag(tag))
    }

    fn slot(&self, slot: GearSlot) -> &Option<GearItem> {
        match slot {
            GearSlot::Weapon => &self.weapon,
            GearSlot::Head => &self.head,
            GearSlot::Body => &self.body,
            GearSlot::Feet => &self.feet,
        }
    }

    fn slot_mut(&mut self, slot: GearSlot) -> &mut Option<GearItem> {
        match slot {
            GearSlot::Weapon => &mut self.weapon,
            GearSlot::Head => &mut self.head,
            GearSlot::Body => &mut self.body,
            GearSlot::Feet => &mut self.feet,
        }
    }
}

/// Builder for constructing equipment.
#[derive(Default)]
pub struct EquipmentBuilder {
    equipment: Equipment,
}

impl EquipmentBuilder {
    pub fn weapon(mut self, item: GearItem) -> Self {
        self.equipment.weapon = Some(item);
        self
    }

    pub fn head(mut self, item: GearItem) -> Self {
        self.equipment.head = Some(item);
        self
    }

    pub fn body(mut self, item: GearItem) -> Self {
        self.equipment.body = Some(item);
        self
    }

    pub fn feet(mut self, item: GearItem) -> Self {
        self.equipment.feet = Some(item);
        self
    }

    pub fn build(self) -> Equipment {
        self.equipment
    }
}
