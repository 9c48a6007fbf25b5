//! Spell definitions - static spell data.
//!
//! A `SpellDefinition` describes what a spell costs, when it may be cast,
//! which selections the caster must make (`TargetStage`s, in order) and
//! the resolver that turns those selections into effect records.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::cards::Arcana;
use crate::core::{Phase, Side};

use super::runtime::SpellRuntimeState;
use super::targeting::ResolveScope;

/// Identifier of a spell in the catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SpellId(pub &'static str);

impl SpellId {
    /// Get the raw identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl std::borrow::Borrow<str> for SpellId {
    fn borrow(&self) -> &str {
        self.0
    }
}

impl std::fmt::Display for SpellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Whose cards a card stage may select, relative to the caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Ownership {
    Ally,
    Enemy,
    Any,
}

impl Ownership {
    /// Whether a card owned by `owner` is acceptable for `caster`.
    #[must_use]
    pub fn admits(self, caster: Side, owner: Side) -> bool {
        match self {
            Ownership::Ally => owner == caster,
            Ownership::Enemy => owner != caster,
            Ownership::Any => true,
        }
    }
}

/// Where a card stage may select from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Location {
    Board,
    Hand,
    Any,
}

/// Constraints on a card selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CardFilter {
    pub ownership: Ownership,
    pub location: Location,
    pub arcana: Option<Arcana>,
    /// Must sit in a lane next to the previous stage's board selection,
    /// on the same side.
    pub adjacent_to_previous: bool,
}

impl CardFilter {
    /// A filter with ownership and location only.
    #[must_use]
    pub const fn new(ownership: Ownership, location: Location) -> Self {
        Self {
            ownership,
            location,
            arcana: None,
            adjacent_to_previous: false,
        }
    }

    /// Require an arcana symbol (builder pattern).
    #[must_use]
    pub const fn with_arcana(mut self, arcana: Arcana) -> Self {
        self.arcana = Some(arcana);
        self
    }

    /// Require adjacency to the previous selection (builder pattern).
    #[must_use]
    pub const fn adjacent(mut self) -> Self {
        self.adjacent_to_previous = true;
        self
    }
}

/// What a stage selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum StageKind {
    /// Nothing to select.
    None,
    /// The caster themself.
    Caster,
    Card(CardFilter),
    Wheel,
}

/// One selection the caster makes before the spell resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TargetStage {
    pub kind: StageKind,
    pub optional: bool,
    pub prompt: &'static str,
}

impl TargetStage {
    const fn of(kind: StageKind, prompt: &'static str) -> Self {
        Self {
            kind,
            optional: false,
            prompt,
        }
    }

    /// A stage with nothing to select.
    #[must_use]
    pub const fn none() -> Self {
        Self::of(StageKind::None, "")
    }

    /// A stage that targets the caster.
    #[must_use]
    pub const fn caster() -> Self {
        Self::of(StageKind::Caster, "")
    }

    /// A card stage.
    #[must_use]
    pub const fn card(filter: CardFilter, prompt: &'static str) -> Self {
        Self::of(StageKind::Card(filter), prompt)
    }

    /// A wheel stage.
    #[must_use]
    pub const fn wheel(prompt: &'static str) -> Self {
        Self::of(StageKind::Wheel, prompt)
    }

    /// Allow the caster to skip this stage (builder pattern).
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Stages resolved without any input from the caster.
    #[must_use]
    pub const fn is_automatic(&self) -> bool {
        matches!(self.kind, StageKind::None | StageKind::Caster)
    }
}

/// Per-side record of successful casts this combat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CastHistory {
    casts: FxHashMap<SpellId, u32>,
}

impl CastHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful casts of a spell so far.
    #[must_use]
    pub fn count(&self, spell: SpellId) -> u32 {
        self.casts.get(&spell).copied().unwrap_or(0)
    }

    /// Record a successful cast.
    pub fn record(&mut self, spell: SpellId) {
        *self.casts.entry(spell).or_insert(0) += 1;
    }

    /// Forget every streak.
    pub fn clear(&mut self) {
        self.casts.clear();
    }
}

/// Inputs to a variable cost.
#[derive(Clone, Copy, Debug)]
pub struct CostContext<'a> {
    pub caster: Side,
    pub phase: Phase,
    pub history: &'a CastHistory,
    pub caster_mana: u32,
    pub opponent_mana: u32,
}

/// Computes a spell's price from the current context.
pub type CostFn = fn(&CostContext<'_>) -> u32;

/// Writes a spell's effect records for a set of resolved targets.
pub type ResolveFn = fn(&ResolveScope<'_>, &mut SpellRuntimeState);

/// Static spell data.
#[derive(Clone)]
pub struct SpellDefinition {
    pub id: SpellId,
    pub name: &'static str,
    pub cost: u32,
    pub variable_cost: Option<CostFn>,
    pub allowed_phases: Vec<Phase>,
    /// Spell is only offered to casters holding a card with this arcana.
    pub required_arcana: Option<Arcana>,
    pub stages: Vec<TargetStage>,
    pub resolver: ResolveFn,
    /// Relative preference for the CPU caster; higher casts first.
    pub cpu_priority: u8,
}

impl SpellDefinition {
    /// Create a spell castable during `Choose` with no target stages.
    pub fn new(id: SpellId, name: &'static str, cost: u32, resolver: ResolveFn) -> Self {
        Self {
            id,
            name,
            cost,
            variable_cost: None,
            allowed_phases: vec![Phase::Choose],
            required_arcana: None,
            stages: Vec::new(),
            resolver,
            cpu_priority: 0,
        }
    }

    /// Price the spell with a function instead of the static cost.
    #[must_use]
    pub fn with_variable_cost(mut self, cost: CostFn) -> Self {
        self.variable_cost = Some(cost);
        self
    }

    /// Replace the allowed phases.
    #[must_use]
    pub fn with_phases(mut self, phases: impl IntoIterator<Item = Phase>) -> Self {
        self.allowed_phases = phases.into_iter().collect();
        self
    }

    /// Append a target stage.
    #[must_use]
    pub fn with_stage(mut self, stage: TargetStage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Only offer the spell to holders of an arcana.
    #[must_use]
    pub fn requires_arcana(mut self, arcana: Arcana) -> Self {
        self.required_arcana = Some(arcana);
        self
    }

    /// Set the CPU preference.
    #[must_use]
    pub fn with_cpu_priority(mut self, priority: u8) -> Self {
        self.cpu_priority = priority;
        self
    }

    /// Whether the spell may be cast in `phase`.
    #[must_use]
    pub fn allows(&self, phase: Phase) -> bool {
        self.allowed_phases.contains(&phase)
    }
}

impl std::fmt::Debug for SpellDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellDefinition")
            .field("id", &self.id)
            .field("cost", &self.cost)
            .field("variable_cost", &self.variable_cost.is_some())
            .field("allowed_phases", &self.allowed_phases)
            .field("required_arcana", &self.required_arcana)
            .field("stages", &self.stages)
            .field("cpu_priority", &self.cpu_priority)
            .finish_non_exhaustive()
    }
}

/// Price of a spell in the given context.
///
/// Static `cost` unless the spell defines a `variable_cost`.
#[must_use]
pub fn compute_cost(spell: &SpellDefinition, ctx: &CostContext<'_>) -> u32 {
    spell.variable_cost.map_or(spell.cost, |cost| cost(ctx))
}
