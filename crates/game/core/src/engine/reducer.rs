use crate::action::Action;
use crate::state::GameState;

use super::GameEngine;

/// Total reducer: returns the state after `action`, or a clone of `state`
/// when the action is rejected.
///
/// Rejections are indistinguishable from doing nothing. Use
/// [`GameEngine::execute`] to find out why an action was rejected.
pub fn reduce(state: &GameState, action: &Action) -> GameState {
    let mut next = state.clone();
    // Rejected actions restore `next` to `state`.
    let _ = GameEngine::new(&mut next).execute(action);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::CardinalDirection;
    use crate::dungeon::Dungeon;
    use crate::state::{BuffKind, EnemyId, ItemId, MineId, Position, Task, TaskId, TaskKind};

    fn state() -> GameState {
        let dungeon = Dungeon::from_ascii("#E###\n#.#g#\n###X#", 0).expect("valid map");
        let mut state = GameState::new().with_dungeon(dungeon);
        state.player.position = Position::new(1, 1);
        state
    }

    #[test]
    fn rejected_actions_are_no_ops() {
        let state = state();
        let rejected = [
            Action::step(CardinalDirection::East),
            Action::step(CardinalDirection::South),
            Action::start_combat(EnemyId(0)),
            Action::start_combat(EnemyId(42)),
            Action::use_item(ItemId(1)),
            Action::apply_buff(BuffKind::TokenBonus, f64::INFINITY),
        ];

        for action in &rejected {
            assert_eq!(reduce(&state, action), state, "{}", action.as_snake_case());
        }
    }

    #[test]
    fn repeating_a_rejected_action_is_stable() {
        let state = state();
        let action = Action::step(CardinalDirection::West);
        let once = reduce(&state, &action);
        let twice = reduce(&once, &action);
        assert_eq!(once, state);
        assert_eq!(twice, once);
    }

    #[test]
    fn accepted_actions_advance_state() {
        let state = state();
        let next = reduce(&state, &Action::step(CardinalDirection::North));
        assert_eq!(next.player.position, Position::new(1, 0));
        assert_eq!(next.nonce, 1);

        let buffed = reduce(&next, &Action::collect_tokens(10));
        assert_eq!(buffed.tokens, 10);
    }

    #[test]
    fn task_rewards_survive_replays_once() {
        let task = Task::new(TaskId::new("air"), TaskKind::Airdrop, "Claim", 30.0);
        let synced = reduce(&state(), &Action::sync_tasks(vec![task]));

        let complete = Action::complete_task(TaskId::new("air"));
        let paid = reduce(&synced, &complete);
        let replayed = reduce(&paid, &complete);

        assert_eq!(paid.total_earned, 30.0);
        assert_eq!(replayed, paid);
    }

    #[test]
    fn mine_upgrades_need_funds() {
        let broke = GameState::for_profile(0, 0.0, Vec::new(), None, 0);
        let upgrade = Action::upgrade_mine(MineId(1));
        assert_eq!(reduce(&broke, &upgrade), broke);

        let mut funded = broke.clone();
        funded.gnome_balance = 100.0;
        let upgraded = reduce(&funded, &upgrade);
        assert_eq!(upgraded.gnome_balance, 0.0);
        assert_eq!(upgraded.mine(MineId(1)).map(|mine| mine.level), Some(2));
    }
}
