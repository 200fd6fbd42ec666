//! Human-readable description of a selection, as shown next to the estimate.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::selection::{Activation, SelectionState};

/// Item lines listed by name before the remainder is collapsed into `외 N개`.
const DETAIL_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSummary {
    pub activation: String,
    pub item_kinds: usize,
    pub total_quantity: u32,
    pub item_detail: String,
    pub switches: String,
    pub third_party_gangs: String,
}

impl SelectionSummary {
    #[must_use]
    pub fn describe(selection: &SelectionState, catalog: &Catalog) -> Self {
        let items = selection.selected_items(catalog);
        let total_quantity = items
            .iter()
            .fold(0_u32, |acc, item| acc.saturating_add(item.quantity));

        let item_detail = if items.is_empty() {
            "없음".to_string()
        } else {
            let mut detail = items
                .iter()
                .take(DETAIL_LIMIT)
                .map(|item| format!("{} x{}", item.product.name, item.quantity))
                .collect::<Vec<_>>()
                .join(", ");
            if items.len() > DETAIL_LIMIT {
                detail.push_str(&format!(" 외 {}개", items.len() - DETAIL_LIMIT));
            }
            detail
        };

        let switches = selection
            .switch_counts()
            .map(|(gang, count)| format!("{gang}구 {count}개"))
            .collect::<Vec<_>>();
        let switches = if switches.is_empty() {
            "선택 없음".to_string()
        } else {
            switches.join(", ")
        };

        Self {
            activation: activation_text(selection.activation).to_string(),
            item_kinds: items.len(),
            total_quantity,
            item_detail,
            switches,
            third_party_gangs: format!("{}구", selection.third_party_gang_total()),
        }
    }
}

#[must_use]
pub fn activation_text(activation: Activation) -> &'static str {
    match activation {
        Activation::Yes => "YES(포함)",
        Activation::No => "NO(미포함)",
        Activation::Unset => "미선택",
    }
}

impl std::fmt::Display for SelectionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "• 개통유무: {}", self.activation)?;
        writeln!(
            f,
            "• 선택 상품: {}종 / 총 {}개",
            self.item_kinds, self.total_quantity
        )?;
        writeln!(f, "  - {}", self.item_detail)?;
        writeln!(f, "• 스위치(우리제품): {}", self.switches)?;
        write!(f, "• 사제 스위치 구수 합계: {}", self.third_party_gangs)
    }
}
