use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

/// One refresh of the simulated headline numbers. Base values are drawn at
/// random, everything else is derived from them.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LiveMetrics {
    pub visitors: u64,
    pub active_visitors: u64,
    pub sales: u64,
    pub orders: u64,
    pub revenue: u64,
    pub profit: u64,
    pub active_carts: u64,
    pub total_products: u64,
    pub low_stock_products: u64,
}

impl LiveMetrics {
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let revenue = rng.gen_range(8_900_000..9_900_000);
        Self {
            visitors: rng.gen_range(850..1_050),
            active_visitors: rng.gen_range(850..900),
            sales: rng.gen_range(2_400_000..2_900_000),
            orders: rng.gen_range(1_200..1_400),
            revenue,
            profit: revenue / 5,
            active_carts: rng.gen_range(1_200..1_500),
            total_products: 12_458 + rng.gen_range(0..100),
            low_stock_products: 245 + rng.gen_range(0..50),
        }
    }

    pub fn cart_products(&self) -> f64 {
        self.active_carts as f64 * 4.5
    }

    pub fn cart_value(&self) -> f64 {
        self.active_carts as f64 * 2000.0
    }

    pub fn pending_payouts(&self) -> f64 {
        self.sales as f64 * 0.25
    }

    pub fn commission_due(&self) -> f64 {
        self.sales as f64 * 0.05
    }

    pub fn profit_loss(&self) -> f64 {
        self.profit as f64 * 0.15
    }

    pub fn net_revenue(&self) -> f64 {
        self.revenue as f64 * 0.1
    }

    /// Display strings keyed by dashboard field.
    pub fn display(&self) -> BTreeMap<&'static str, String> {
        let mut out = BTreeMap::new();
        out.insert("liveRevenue", format_crore(self.revenue as f64));
        out.insert("onlineUsers", format_count(self.active_visitors));
        out.insert("totalVisitors", format_count(self.visitors));
        out.insert("activeVisitors", format_count(self.active_visitors));
        out.insert("totalSales", format_lakh(self.sales as f64));
        out.insert("totalOrders", format_count(self.orders));
        out.insert("companyRevenue", format_crore(self.revenue as f64));
        out.insert("companyProfit", format_crore(self.profit as f64));
        out.insert("activeCarts", format_count(self.active_carts));
        out.insert("cartProducts", format_decimal(self.cart_products()));
        out.insert("cartValue", format_lakh(self.cart_value()));
        out.insert("totalProducts", format_count(self.total_products));
        out.insert("lowStockProducts", format_count(self.low_stock_products));
        out.insert("todayRevenue", format_lakh(self.sales as f64));
        out.insert("pendingPayouts", format_lakh(self.pending_payouts()));
        out.insert("profitLoss", format!("+{}", format_lakh(self.profit_loss())));
        out.insert("commissionDue", format_lakh(self.commission_due()));
        out.insert("netRevenue", format_crore(self.net_revenue()));
        out
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FinancialReport {
    pub profit: u64,
    pub commission: u64,
    pub net: u64,
}

impl FinancialReport {
    /// Simulated calculation run; commission is 5 % of profit.
    pub fn calculate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let profit = rng.gen_range(1_500_000..2_000_000);
        let commission = profit / 20;
        Self {
            profit,
            commission,
            net: profit - commission,
        }
    }

    pub fn display(&self) -> BTreeMap<&'static str, String> {
        let mut out = BTreeMap::new();
        out.insert("profitLoss", format!("+{}", format_lakh(self.profit as f64)));
        out.insert("commissionDue", format!("₹{:.0}K", self.commission as f64 / 1_000.0));
        out.insert("netRevenue", format!("₹{:.2}Cr", self.net as f64 / 10_000_000.0));
        out
    }
}

/// `₹24.5L`
pub fn format_lakh(amount: f64) -> String {
    format!("₹{:.1}L", amount / 100_000.0)
}

/// `₹0.9Cr`
pub fn format_crore(amount: f64) -> String {
    format!("₹{:.1}Cr", amount / 10_000_000.0)
}

/// Thousands-separated integer, `12,458`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_decimal(value: f64) -> String {
    let whole = value.trunc() as u64;
    let frac = value - whole as f64;
    if frac.abs() < f64::EPSILON {
        format_count(whole)
    } else {
        format!("{}.{}", format_count(whole), (frac * 10.0).round() as u64)
    }
}
