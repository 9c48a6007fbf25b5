//! Spell catalogue: registry and the standard spell list.
//!
//! The `SpellCatalogue` stores spell definitions keyed by `SpellId` and
//! keeps registration order, so listings (and CPU tie-breaks) are stable.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::cards::{Arcana, Card, CardTag, StatDelta};
use crate::core::Phase;

use super::definition::{CardFilter, CostContext, Location, Ownership, SpellDefinition, SpellId, TargetStage};
use super::runtime::{DelayedKind, DelayedTiming, SpellRuntimeState};
use super::targeting::ResolveScope;

/// Identifiers of the standard spells.
pub mod ids {
    use super::SpellId;

    pub const FIREBALL: SpellId = SpellId("fireball");
    pub const FROSTBITE: SpellId = SpellId("frostbite");
    pub const MIRROR_IMAGE: SpellId = SpellId("mirror_image");
    pub const BOLSTER: SpellId = SpellId("bolster");
    pub const SIPHON: SpellId = SpellId("siphon");
    pub const TRANSPOSE: SpellId = SpellId("transpose");
    pub const HOURGLASS: SpellId = SpellId("hourglass");
    pub const GAMBIT: SpellId = SpellId("gambit");
    pub const USURP: SpellId = SpellId("usurp");
    pub const MIND_ROT: SpellId = SpellId("mind_rot");
    pub const INSIGHT: SpellId = SpellId("insight");
    pub const BANKED_SURGE: SpellId = SpellId("banked_surge");
    pub const EMPOWER: SpellId = SpellId("empower");
}

/// Registry of spell definitions.
///
/// ## Example
///
/// ```
/// use wheel_duel::spells::{ids, SpellCatalogue};
///
/// let catalogue = SpellCatalogue::standard();
/// let fireball = catalogue.get("fireball").unwrap();
/// assert_eq!(fireball.id, ids::FIREBALL);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpellCatalogue {
    spells: FxHashMap<SpellId, SpellDefinition>,
    order: Vec<SpellId>,
}

impl SpellCatalogue {
    /// Create a new empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spell.
    ///
    /// Panics if a spell with the same ID already exists.
    pub fn register(&mut self, spell: SpellDefinition) {
        if self.spells.contains_key(&spell.id) {
            panic!("Spell with ID {} already registered", spell.id);
        }
        self.order.push(spell.id);
        self.spells.insert(spell.id, spell);
    }

    /// Get a spell by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SpellDefinition> {
        self.spells.get(id)
    }

    /// Check if a spell ID is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.spells.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.spells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    /// Iterate over spells in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &SpellDefinition> {
        self.order.iter().filter_map(|id| self.spells.get(id))
    }

    /// Spells offered to a caster holding `cards`.
    ///
    /// A spell with a required arcana is only listed when one of the cards
    /// carries that arcana.
    pub fn visible_to<'a>(&self, cards: impl IntoIterator<Item = &'a Card>) -> Vec<&SpellDefinition> {
        let held: FxHashSet<Arcana> = cards.into_iter().filter_map(|card| card.arcana).collect();
        self.iter()
            .filter(|spell| spell.required_arcana.map_or(true, |arcana| held.contains(&arcana)))
            .collect()
    }

    /// The standard spell list.
    #[must_use]
    pub fn standard() -> Self {
        let enemy_board = CardFilter::new(Ownership::Enemy, Location::Board);
        let ally_board = CardFilter::new(Ownership::Ally, Location::Board);

        let mut catalogue = Self::new();

        catalogue.register(
            SpellDefinition::new(ids::FIREBALL, "Fireball", 2, fireball)
                .with_variable_cost(fireball_cost)
                .with_phases([Phase::Choose, Phase::Showdown])
                .requires_arcana(Arcana::Flame)
                .with_stage(TargetStage::card(enemy_board, "Choose an enemy card to scorch"))
                .with_stage(TargetStage::card(enemy_board.adjacent(), "Choose an adjacent card to singe").optional())
                .with_cpu_priority(7),
        );
        catalogue.register(
            SpellDefinition::new(ids::FROSTBITE, "Frostbite", 1, frostbite)
                .with_stage(TargetStage::card(enemy_board, "Choose an enemy card to chill"))
                .with_stage(
                    TargetStage::card(
                        enemy_board.adjacent().with_arcana(Arcana::Frost),
                        "Choose an adjacent frost card",
                    )
                    .optional(),
                )
                .with_cpu_priority(4),
        );
        catalogue.register(
            SpellDefinition::new(ids::MIRROR_IMAGE, "Mirror Image", 3, mirror_image)
                .with_stage(TargetStage::card(ally_board, "Choose a card to become its rival's mirror"))
                .with_cpu_priority(6),
        );
        catalogue.register(
            SpellDefinition::new(ids::BOLSTER, "Bolster", 2, bolster)
                .with_stage(TargetStage::card(ally_board, "Choose a card to bolster"))
                .with_cpu_priority(5),
        );
        catalogue.register(SpellDefinition::new(ids::SIPHON, "Siphon", 2, siphon).with_cpu_priority(5));
        catalogue.register(
            SpellDefinition::new(ids::TRANSPOSE, "Transpose", 2, transpose)
                .with_stage(TargetStage::card(ally_board, "Choose a card to move"))
                .with_stage(TargetStage::card(ally_board.adjacent(), "Choose its neighbour"))
                .with_cpu_priority(2),
        );
        catalogue.register(
            SpellDefinition::new(ids::HOURGLASS, "Hourglass", 2, hourglass)
                .with_stage(TargetStage::wheel("Choose a wheel to turn"))
                .with_cpu_priority(3),
        );
        catalogue.register(
            SpellDefinition::new(ids::GAMBIT, "Gambit", 1, gambit)
                .with_stage(TargetStage::none())
                .with_cpu_priority(2),
        );
        catalogue.register(
            SpellDefinition::new(ids::USURP, "Usurp", 4, usurp)
                .with_stage(TargetStage::caster())
                .with_cpu_priority(9),
        );
        catalogue.register(
            SpellDefinition::new(ids::MIND_ROT, "Mind Rot", 2, mind_rot)
                .with_stage(TargetStage::none())
                .with_cpu_priority(4),
        );
        catalogue.register(
            SpellDefinition::new(ids::INSIGHT, "Insight", 1, insight)
                .with_phases([Phase::Choose, Phase::RoundEnd])
                .with_stage(TargetStage::caster())
                .with_cpu_priority(3),
        );
        catalogue.register(
            SpellDefinition::new(ids::BANKED_SURGE, "Banked Surge", 2, banked_surge)
                .with_stage(TargetStage::caster())
                .with_cpu_priority(1),
        );
        catalogue.register(
            SpellDefinition::new(ids::EMPOWER, "Empower", 1, empower)
                .with_stage(TargetStage::card(
                    CardFilter::new(Ownership::Ally, Location::Hand),
                    "Choose a reserve card to empower",
                ))
                .with_cpu_priority(3),
        );

        catalogue
    }
}

// ============================================================================
// Costs
// ============================================================================

/// Two mana, plus one for every earlier fireball this combat.
fn fireball_cost(ctx: &CostContext<'_>) -> u32 {
    2 + ctx.history.count(ids::FIREBALL)
}

// ============================================================================
// Resolvers
// ============================================================================

const FIREBALL_DAMAGE: i32 = 3;
const FIREBALL_SPLASH: i32 = 1;
const BOLSTER_AMOUNT: i32 = 2;
const SIPHON_DRAIN: i32 = 2;
const HOURGLASS_TURN: i32 = 2;
const SURGE_MANA: u32 = 4;
const EMPOWER_AMOUNT: i32 = 2;

fn fireball(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    let Some(target) = scope.live_card(0) else {
        state.log("Fireball fizzles");
        return;
    };
    state.adjust_card(target.side, target.card.id, StatDelta::uniform(-FIREBALL_DAMAGE));
    state.log(format!("Fireball scorches {} for {FIREBALL_DAMAGE}", target.card.name));

    if let Some(splash) = scope.live_card(1) {
        state.adjust_card(splash.side, splash.card.id, StatDelta::uniform(-FIREBALL_SPLASH));
        state.log(format!("Flames spill onto {}", splash.card.name));
    }
}

fn frostbite(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    for index in 0..scope.targets.len() {
        if let Some(target) = scope.live_card(index) {
            state.chill(target.card.id, 1);
            state.log(format!("{} is chilled", target.card.name));
        }
    }
}

fn mirror_image(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    let Some(target) = scope.live_card(0) else {
        return;
    };
    let rival = target
        .lane()
        .and_then(|lane| scope.ctx.board[target.side.opponent()][lane].as_ref());

    match rival {
        Some(source) => {
            state.mirror(target.side, target.card.id, target.side.opponent(), source.id);
            state.log(format!("{} mirrors {}", target.card.name, source.name));
        }
        None => state.log(format!("{} finds nothing to mirror", target.card.name)),
    }
}

fn bolster(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    if let Some(target) = scope.live_card(0) {
        state.adjust_card(target.side, target.card.id, StatDelta::uniform(BOLSTER_AMOUNT));
        state.log(format!("{} is bolstered", target.card.name));
    }
}

fn siphon(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    state.drain_reserve(scope.opponent(), SIPHON_DRAIN);
    state.log(format!("{} siphons {SIPHON_DRAIN} from the {} reserve", scope.caster, scope.opponent()));
}

fn transpose(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    let (Some(first), Some(second)) = (scope.live_card(0), scope.live_card(1)) else {
        return;
    };
    if first.card.has_tag(CardTag::Anchored) || second.card.has_tag(CardTag::Anchored) {
        state.log("An anchored card refuses to move");
        return;
    }
    state.swap_positions(first.side, first.card.id, second.card.id);
    state.log(format!("{} and {} trade places", first.card.name, second.card.name));
}

fn hourglass(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    if let Some(wheel) = scope.wheel(0) {
        state.adjust_wheel_token(wheel, HOURGLASS_TURN);
        state.log(format!("Wheel {} turns by {HOURGLASS_TURN}", wheel + 1));
    }
}

fn gambit(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    state.challenge_initiative(scope.caster);
    state.log(format!("{} challenges for initiative", scope.caster));
}

fn usurp(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    if scope.ctx.initiative == scope.caster {
        state.log(format!("{} already holds initiative", scope.caster));
        return;
    }
    state.claim_initiative(scope.caster);
    state.log(format!("{} seizes initiative", scope.caster));
}

fn mind_rot(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    state.discard_from_hand(scope.opponent(), 1);
    state.log(format!("{} must discard a card", scope.opponent()));
}

fn insight(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    state.draw(scope.caster, 1);
}

fn banked_surge(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    state.delay(
        scope.caster,
        DelayedTiming::RoundEnd,
        DelayedKind::GainMana(SURGE_MANA),
        scope.spell.name,
    );
    state.log(format!("{} banks {SURGE_MANA} mana for round end", scope.caster));
}

fn empower(scope: &ResolveScope<'_>, state: &mut SpellRuntimeState) {
    if let Some(target) = scope.live_card(0) {
        state.adjust_hand_card(target.side, target.card.id, StatDelta::uniform(EMPOWER_AMOUNT));
        state.log(format!("{} is empowered in reserve", target.card.name));
    }
}
