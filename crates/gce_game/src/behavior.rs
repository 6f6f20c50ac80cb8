//! Per-entity behavior state.
//!
//! Two ways in: `select` applies the state picked from thresholds every tick
//! (speed, ground contact, distance), `trigger` enters an event state such as
//! a hurt flinch or an attack pose. While an event state is active, threshold
//! selections only update the state to fall back to; a scheduled `revert`
//! carrying the matching token ends the event. Death is terminal.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorState {
    Idle,
    Walk,
    Jump,
    Attack,
    Shoot,
    Summon,
    Charge,
    Hurt,
    Death,
}

impl BehaviorState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Jump => "jump",
            Self::Attack => "attack",
            Self::Shoot => "shoot",
            Self::Summon => "summon",
            Self::Charge => "charge",
            Self::Hurt => "hurt",
            Self::Death => "death",
        }
    }
}

impl std::fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EventState {
    token: u32,
    fallback: BehaviorState,
}

#[derive(Debug, Clone)]
pub struct StateMachine {
    current: BehaviorState,
    event: Option<EventState>,
    next_token: u32,
}

impl StateMachine {
    pub fn new(initial: BehaviorState) -> Self {
        Self {
            current: initial,
            event: None,
            next_token: 0,
        }
    }

    pub fn current(&self) -> BehaviorState {
        self.current
    }

    pub fn select(&mut self, state: BehaviorState) {
        if self.current == BehaviorState::Death {
            return;
        }
        match &mut self.event {
            Some(event) => event.fallback = state,
            None => self.current = state,
        }
    }

    /// Enter an event state and return the token its revert must present.
    pub fn trigger(&mut self, state: BehaviorState) -> u32 {
        self.next_token = self.next_token.wrapping_add(1);
        if self.current == BehaviorState::Death {
            return self.next_token;
        }
        let fallback = self.event.map_or(self.current, |event| event.fallback);
        self.event = Some(EventState {
            token: self.next_token,
            fallback,
        });
        self.current = state;
        self.next_token
    }

    /// End the event state started with `token`. Stale tokens are ignored.
    pub fn revert(&mut self, token: u32) {
        if let Some(event) = self.event {
            if event.token == token {
                self.current = event.fallback;
                self.event = None;
            }
        }
    }

    pub fn kill(&mut self) {
        self.current = BehaviorState::Death;
        self.event = None;
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(BehaviorState::Idle)
    }
}
