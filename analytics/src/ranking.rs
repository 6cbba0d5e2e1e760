use corelib::models::ShockSignal;

/// Order signals for presentation: highest score first. The sort is
/// stable, so equal scores keep their encounter order.
pub fn rank_signals(signals: &mut [ShockSignal]) {
    signals.sort_by(|a, b| b.score.total_cmp(&a.score));
}
