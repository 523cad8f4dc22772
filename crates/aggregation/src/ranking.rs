//! Bot frequency ranking.

use mev_inspector_events::SandwichEvent;
use serde::Serialize;
use std::collections::HashMap;

/// Number of attacks attributed to one bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotCount {
    pub bot_address: String,
    pub count: usize,
}

/// Rank bots by how many events they appear in.
///
/// # Arguments
/// * `events` - Events to count over; duplicates count separately
/// * `limit` - Maximum number of entries returned
///
/// # Returns
/// Entries sorted by count descending, equal counts by address ascending
pub fn rank_bots(events: &[SandwichEvent], limit: usize) -> Vec<BotCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for event in events {
        *counts.entry(event.bot_address.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<BotCount> = counts
        .into_iter()
        .map(|(bot_address, count)| BotCount {
            bot_address: bot_address.to_string(),
            count,
        })
        .collect();

    // HashMap order is random; the address tie-break keeps ticks stable.
    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.bot_address.cmp(&b.bot_address))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(bots: &[&str]) -> Vec<SandwichEvent> {
        bots.iter()
            .enumerate()
            .map(|(i, bot)| SandwichEvent::new(i as u64, *bot, "0xV", format!("0xT{}", i)))
            .collect()
    }

    #[test]
    fn test_rank_by_count() {
        let ranked = rank_bots(&events(&["0xB", "0xA", "0xA", "0xC", "0xA", "0xB"]), 5);
        assert_eq!(
            ranked,
            vec![
                BotCount { bot_address: "0xA".into(), count: 3 },
                BotCount { bot_address: "0xB".into(), count: 2 },
                BotCount { bot_address: "0xC".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_truncates_to_limit() {
        let input = events(&["0x1", "0x2", "0x3", "0x4", "0x5", "0x6", "0x7", "0x7"]);
        let ranked = rank_bots(&input, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0], BotCount { bot_address: "0x7".into(), count: 2 });
    }

    #[test]
    fn test_ties_are_deterministic() {
        let input = events(&["0xD", "0xC", "0xB", "0xA"]);
        let first = rank_bots(&input, 3);
        for _ in 0..10 {
            assert_eq!(rank_bots(&input, 3), first);
        }
        let order: Vec<&str> = first.iter().map(|b| b.bot_address.as_str()).collect();
        assert_eq!(order, vec!["0xA", "0xB", "0xC"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_bots(&[], 5).is_empty());
        assert!(rank_bots(&events(&["0xA"]), 0).is_empty());
    }
}
