//! Between-run shop
//!
//! Items are bought once with banked coins and stay owned for the rest of the
//! session. Buying an owned or unaffordable item is a no-op.

use crate::config::ShopConfig;
use crate::player::BuffKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShopItem {
    /// Doubles every coin picked up
    CoinDoubler,
    /// Each run starts invincible for a short while
    StartShield,
    /// One extra hit point per run
    ExtraLife,
}

impl ShopItem {
    pub fn all() -> [ShopItem; 3] {
        [ShopItem::CoinDoubler, ShopItem::StartShield, ShopItem::ExtraLife]
    }

    /// Menu slot (1-based) to item
    pub fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(ShopItem::CoinDoubler),
            2 => Some(ShopItem::StartShield),
            3 => Some(ShopItem::ExtraLife),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShopItem::CoinDoubler => "Coin Doubler",
            ShopItem::StartShield => "Start Shield",
            ShopItem::ExtraLife => "Extra Life",
        }
    }
}

pub struct Shop {
    owned: BTreeSet<ShopItem>,
    config: ShopConfig,
}

impl Shop {
    pub fn new(config: ShopConfig) -> Self {
        Shop {
            owned: BTreeSet::new(),
            config,
        }
    }

    pub fn price(&self, item: ShopItem) -> u32 {
        match item {
            ShopItem::CoinDoubler => self.config.coin_doubler_price,
            ShopItem::StartShield => self.config.start_shield_price,
            ShopItem::ExtraLife => self.config.extra_life_price,
        }
    }

    pub fn owns(&self, item: ShopItem) -> bool {
        self.owned.contains(&item)
    }

    /// Deducts the price from `wallet` and records ownership
    pub fn purchase(&mut self, item: ShopItem, wallet: &mut u32) -> bool {
        let price = self.price(item);
        if self.owns(item) || *wallet < price {
            return false;
        }

        *wallet -= price;
        self.owned.insert(item);
        info!(item = item.name(), price, "item purchased");
        true
    }

    pub fn coin_multiplier(&self) -> u32 {
        if self.owns(ShopItem::CoinDoubler) { 2 } else { 1 }
    }

    pub fn starting_buff(&self) -> Option<(BuffKind, u32)> {
        self.owns(ShopItem::StartShield)
            .then_some((BuffKind::Invincible, self.config.start_shield_ticks))
    }

    pub fn bonus_health(&self) -> u32 {
        if self.owns(ShopItem::ExtraLife) { 1 } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_deducts_price() {
        let mut shop = Shop::new(ShopConfig::default());
        let mut wallet = 100;

        assert!(shop.purchase(ShopItem::CoinDoubler, &mut wallet));
        assert_eq!(wallet, 50);
        assert_eq!(shop.coin_multiplier(), 2);
    }

    #[test]
    fn test_owned_item_is_noop() {
        let mut shop = Shop::new(ShopConfig::default());
        let mut wallet = 100;
        shop.purchase(ShopItem::StartShield, &mut wallet);

        assert!(!shop.purchase(ShopItem::StartShield, &mut wallet));
        assert_eq!(wallet, 70);
    }

    #[test]
    fn test_unaffordable_is_noop() {
        let mut shop = Shop::new(ShopConfig::default());
        let mut wallet = 10;

        assert!(!shop.purchase(ShopItem::ExtraLife, &mut wallet));
        assert_eq!(wallet, 10);
        assert_eq!(shop.bonus_health(), 0);
    }

    #[test]
    fn test_effects() {
        let mut shop = Shop::new(ShopConfig::default());
        assert_eq!(shop.starting_buff(), None);

        let mut wallet = 1000;
        shop.purchase(ShopItem::StartShield, &mut wallet);
        shop.purchase(ShopItem::ExtraLife, &mut wallet);

        assert_eq!(shop.starting_buff(), Some((BuffKind::Invincible, 180)));
        assert_eq!(shop.bonus_health(), 1);
        assert_eq!(shop.coin_multiplier(), 1);
    }
}
