use anyhow::bail;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::shared::util::number_emoji;

pub const DIRECTIONS: [&str; 4] = ["東", "西", "南", "北"];

pub const LUCKY_COLORS: [&str; 16] = [
    "白",
    "黒",
    "シルバー",
    "グレイ",
    "赤",
    "栗色",
    "黄色",
    "オリーブ色",
    "ライム",
    "緑",
    "アクア",
    "ティール",
    "青",
    "ネイビー",
    "フクシャ",
    "紫",
];

const FORTUNE_TABLE: &[(&str, f64, &[&str])] = &[
    (
        "鯖の女神降臨",
        0.1,
        &[
            "今日は何をやっても上手くいく最強の一日！？",
            "推しから神対応が返ってくるかも！？",
            "運命の出会いが待っているかも！？",
            "宝くじ買うなら今日ちゃうん！？",
        ],
    ),
    (
        "大吉",
        2.0,
        &[
            "気になるあの子に声かけたらいいんちゃうん！？知らんけど",
            "新しいこと始めたらめっちゃ上手くいくんちゃうん！？知らんけど",
            "今日はあんたが主役なんちゃうん！？知らんけど",
            "欲しかったもん今日こそ買い時なんちゃうん！？知らんけど",
            "会議で発言したらめっちゃウケるんちゃうん！？知らんけど",
        ],
    ),
    (
        "中吉",
        10.0,
        &[
            "ええ知らせが届くかも！？",
            "いつもより調子がいいかも！？",
            "新しい趣味が見つかるかも！？",
            "探しもんが見つかるかも？？",
            "自撮りが爆盛れかも！？",
        ],
    ),
    (
        "小吉",
        20.0,
        &[
            "美味しいもんに出会えて幸せ♡",
            "友達に褒められてご機嫌♡",
            "今日は貴方が一番星♡",
            "ちょっとした親切が返ってくる♡",
            "お昼寝が最高に気持ちいい♡",
        ],
    ),
    (
        "吉",
        30.0,
        &[
            "食べ過ぎ注意",
            "二度寝注意",
            "忘れもん注意",
            "うっかり発言注意",
            "夜更かし注意",
        ],
    ),
    (
        "凶",
        25.0,
        &[
            "スマホ見すぎて目が疲れるかも？",
            "探しもんに時間を使いすぎて萎えちゃうかも？",
            "充電切れてるかも？？",
            "大事な連絡を見逃すかも？",
            "今日はやる気の勃ちが悪いかも？",
        ],
    ),
    (
        "大凶",
        12.8,
        &[
            "今日サボったら明日倍返しやで？ｗｗ",
            "傘忘れたら絶対雨降るやつやで！？ｗｗ",
            "口滑らせたら一日引きずるで？ｗｗ",
            "夜更かししたら明日使いもんにならへんで！？ｗｗ",
            "調子乗ったら足すくわれるかもしれへんで？ｗｗ",
        ],
    ),
    (
        "救いようがない日",
        0.1,
        &[
            "今日は大人しく寝とくのが一番ちゃう？",
            "何もせんのが一番の開運法かもしれへんで😇",
            "明日に期待しよ。今日はもうあかん。",
            "徳を積まな運気は戻らへんで？",
        ],
    ),
];

#[derive(Clone, Debug)]
pub struct FortuneTier {
    pub name: &'static str,
    pub weight: f64,
    pub variants: &'static [&'static str],
}

/// Immutable weighted table of outcome tiers. Built once at startup; a
/// malformed table is rejected before any draw traffic is accepted.
#[derive(Clone, Debug)]
pub struct FortuneCatalog {
    tiers: Vec<FortuneTier>,
    total_weight: f64,
}

impl FortuneCatalog {
    pub fn load() -> anyhow::Result<Self> {
        let tiers = FORTUNE_TABLE
            .iter()
            .map(|&(name, weight, variants)| FortuneTier {
                name,
                weight,
                variants,
            })
            .collect::<Vec<_>>();
        Self::new(tiers)
    }

    pub fn new(tiers: Vec<FortuneTier>) -> anyhow::Result<Self> {
        if tiers.is_empty() {
            bail!("The fortune catalog must contain at least one tier.");
        }
        for tier in tiers.iter() {
            if !tier.weight.is_finite() || tier.weight <= 0.0 {
                bail!("The tier {} must have a positive finite weight.", tier.name);
            }
            if tier.variants.is_empty() {
                bail!("The tier {} must have at least one message variant.", tier.name);
            }
        }
        let total_weight = tiers.iter().map(|tier| tier.weight).sum();
        Ok(FortuneCatalog {
            tiers,
            total_weight,
        })
    }

    /// Weighted draw of one (tier, variant) pair. Deterministic given the
    /// random source: x is uniform in [0, total), and the first tier whose
    /// cumulative weight reaches x wins.
    pub fn draw(&self, rng: &mut impl Rng) -> (&'static str, &'static str) {
        let pick = rng.gen_range(0.0..self.total_weight);
        let mut cumulative = 0.0;
        let mut chosen = &self.tiers[self.tiers.len() - 1];
        for tier in self.tiers.iter() {
            cumulative += tier.weight;
            if cumulative >= pick {
                chosen = tier;
                break;
            }
        }
        let variant = chosen
            .variants
            .choose(rng)
            .copied()
            .unwrap_or(chosen.variants[0]);
        (chosen.name, variant)
    }

    pub fn tiers(&self) -> &[FortuneTier] {
        &self.tiers
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct FortuneOutcome {
    pub tier: String,
    pub message: String,
    pub direction: String,
    pub number: u8,
    pub number_emoji: String,
    pub color: String,
}

impl FortuneOutcome {
    pub fn draw(catalog: &FortuneCatalog, rng: &mut impl Rng) -> Self {
        let (tier, message) = catalog.draw(rng);
        let direction = DIRECTIONS.choose(rng).copied().unwrap_or(DIRECTIONS[0]);
        let number = rng.gen_range(1..=15_u8);
        let color = LUCKY_COLORS.choose(rng).copied().unwrap_or(LUCKY_COLORS[0]);
        FortuneOutcome {
            tier: tier.to_string(),
            message: message.to_string(),
            direction: direction.to_string(),
            number,
            number_emoji: number_emoji(number),
            color: color.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = FortuneCatalog::load().unwrap();
        assert_eq!(catalog.tiers().len(), 8);
        assert!((catalog.total_weight() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(FortuneCatalog::new(vec![]).is_err());
    }

    #[test]
    fn rejects_non_positive_weight() {
        let tiers = vec![FortuneTier {
            name: "吉",
            weight: 0.0,
            variants: &["ええ感じ"],
        }];
        assert!(FortuneCatalog::new(tiers).is_err());

        let tiers = vec![FortuneTier {
            name: "凶",
            weight: -1.0,
            variants: &["あかん"],
        }];
        assert!(FortuneCatalog::new(tiers).is_err());
    }

    #[test]
    fn rejects_empty_variant_pool() {
        let tiers = vec![FortuneTier {
            name: "大吉",
            weight: 1.0,
            variants: &[],
        }];
        assert!(FortuneCatalog::new(tiers).is_err());
    }

    #[test]
    fn draw_is_deterministic_per_seed() {
        let catalog = FortuneCatalog::load().unwrap();
        let mut first = StdRng::seed_from_u64(42);
        let mut second = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(catalog.draw(&mut first), catalog.draw(&mut second));
        }
    }

    #[test]
    fn drawn_variant_belongs_to_drawn_tier() {
        let catalog = FortuneCatalog::load().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let (tier_name, variant) = catalog.draw(&mut rng);
            let tier = catalog
                .tiers()
                .iter()
                .find(|tier| tier.name == tier_name)
                .unwrap();
            assert!(tier.variants.contains(&variant));
        }
    }

    #[test]
    fn tier_frequencies_follow_weights() {
        let catalog = FortuneCatalog::load().unwrap();
        let mut rng = StdRng::seed_from_u64(1234);
        let draws = 200_000;

        let mut observed = HashMap::new();
        for _ in 0..draws {
            let (tier_name, _) = catalog.draw(&mut rng);
            *observed.entry(tier_name).or_insert(0_u32) += 1;
        }

        for tier in catalog.tiers() {
            let expected = tier.weight / catalog.total_weight();
            let actual =
                f64::from(observed.get(tier.name).copied().unwrap_or(0)) / f64::from(draws);
            assert!(
                (expected - actual).abs() < 0.01,
                "tier {} drifted: expected {}, got {}",
                tier.name,
                expected,
                actual
            );
        }
    }

    #[test]
    fn outcome_extras_stay_in_range() {
        let catalog = FortuneCatalog::load().unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..500 {
            let outcome = FortuneOutcome::draw(&catalog, &mut rng);
            assert!((1..=15).contains(&outcome.number));
            assert!(DIRECTIONS.contains(&outcome.direction.as_str()));
            assert!(LUCKY_COLORS.contains(&outcome.color.as_str()));
            assert_eq!(outcome.number_emoji, number_emoji(outcome.number));
        }
    }
}
