use std::collections::VecDeque;
use std::marker::PhantomData;

/// Synchronous effect-driven state machine.
///
/// Effects run one at a time on the calling thread. When an effect yields an
/// event, the effects produced by that transition run before whatever was
/// still queued, so a chain of effects always completes before its siblings.
/// The machine stops once no effects remain and returns the final state.
pub struct StateMachine<TState, TEvent, TEffect, T, R, E>
where
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>),
    R: Fn(&TState),
    E: FnMut(TEffect) -> Option<TEvent>,
{
    pub init: (TState, Vec<TEffect>),
    pub transition_fn: T,
    pub render_fn: R,
    pub run_effect_fn: E,
    _event: PhantomData<TEvent>,
}

impl<TState, TEvent, TEffect, T, R, E> StateMachine<TState, TEvent, TEffect, T, R, E>
where
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>),
    R: Fn(&TState),
    E: FnMut(TEffect) -> Option<TEvent>,
{
    pub fn new(
        init: (TState, Vec<TEffect>),
        transition_fn: T,
        render_fn: R,
        run_effect_fn: E,
    ) -> Self {
        Self {
            init,
            transition_fn,
            render_fn,
            run_effect_fn,
            _event: PhantomData,
        }
    }

    pub fn run(self) -> TState {
        let Self {
            init: (mut state, effects),
            transition_fn,
            render_fn,
            mut run_effect_fn,
            ..
        } = self;

        render_fn(&state);

        let mut pending: VecDeque<TEffect> = effects.into();

        while let Some(effect) = pending.pop_front() {
            let Some(event) = run_effect_fn(effect) else {
                continue;
            };

            let (new_state, new_effects) = transition_fn(state, event);
            render_fn(&new_state);
            state = new_state;

            for effect in new_effects.into_iter().rev() {
                pending.push_front(effect);
            }
        }

        state
    }
}
