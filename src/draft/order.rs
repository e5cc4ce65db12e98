use super::kind::ActionKind;
use super::side::Side;

/// the standard tournament draft order, used by the simulator.
/// replays instead derive next-to-act from the recorded action list,
/// since historical tournaments do not all share one order.
pub const ORDER: [(Side, ActionKind); 20] = [
    (Side::Blue, ActionKind::Ban),
    (Side::Red, ActionKind::Ban),
    (Side::Blue, ActionKind::Ban),
    (Side::Red, ActionKind::Ban),
    (Side::Blue, ActionKind::Ban),
    (Side::Red, ActionKind::Ban),
    (Side::Blue, ActionKind::Pick),
    (Side::Red, ActionKind::Pick),
    (Side::Red, ActionKind::Pick),
    (Side::Blue, ActionKind::Pick),
    (Side::Blue, ActionKind::Pick),
    (Side::Red, ActionKind::Pick),
    (Side::Red, ActionKind::Ban),
    (Side::Blue, ActionKind::Ban),
    (Side::Red, ActionKind::Ban),
    (Side::Blue, ActionKind::Ban),
    (Side::Red, ActionKind::Pick),
    (Side::Blue, ActionKind::Pick),
    (Side::Blue, ActionKind::Pick),
    (Side::Red, ActionKind::Pick),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_bans_ten_picks() {
        let bans = ORDER.iter().filter(|(_, k)| *k == ActionKind::Ban).count();
        let picks = ORDER.iter().filter(|(_, k)| *k == ActionKind::Pick).count();
        assert!(bans == 10);
        assert!(picks == 10);
    }

    #[test]
    fn five_each_per_side() {
        for side in [Side::Blue, Side::Red] {
            for kind in [ActionKind::Ban, ActionKind::Pick] {
                let n = ORDER.iter().filter(|x| **x == (side, kind)).count();
                assert!(n == 5);
            }
        }
    }
}
