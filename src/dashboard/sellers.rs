use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::model::seller::{ActiveSeller, ApplicationStatus, SellerApplication};

/// Applications kept in the queue. Decided ones are dropped first.
pub const MAX_APPLICATIONS: usize = 50;
pub const MAX_ACTIVE_SELLERS: usize = 50;

const COMPANIES: [&str; 5] = [
    "Tech Gadgets",
    "Style Street",
    "Kitchen King",
    "Fitness Gear",
    "Book World",
];
const CATEGORIES: [&str; 5] = ["Electronics", "Fashion", "Home", "Sports", "Books"];
const SUBMITTED: [&str; 3] = ["Just now", "2 mins ago", "5 mins ago"];
const SELLER_NAMES: [&str; 5] = [
    "Raj Electronics",
    "Fashion Trends",
    "Home Decor",
    "Beauty Box",
    "Sports Gear",
];

fn pick<'a, R: Rng + ?Sized>(pool: &[&'a str], rng: &mut R) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}

/// Seller applications, newest first, plus the sellers approved so far.
#[derive(Debug, Clone)]
pub struct ApplicationQueue {
    applications: Vec<SellerApplication>,
    active: Vec<ActiveSeller>,
}

impl Default for ApplicationQueue {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ApplicationQueue {
    pub fn empty() -> Self {
        Self {
            applications: Vec::new(),
            active: Vec::new(),
        }
    }

    /// The four applications the dashboard opens with.
    pub fn seeded() -> Self {
        let seed = [
            ("1", "Fashion Hub India", "Today, 10:30 AM", "Fashion"),
            ("2", "Electro World", "Today, 9:15 AM", "Electronics"),
            ("3", "Home Decor Studio", "Yesterday, 4:45 PM", "Home"),
            ("4", "Beauty Bliss", "Yesterday, 2:30 PM", "Beauty"),
        ];
        Self {
            applications: seed
                .iter()
                .map(|(id, name, submitted, category)| SellerApplication {
                    id: id.to_string(),
                    name: name.to_string(),
                    submitted: submitted.to_string(),
                    category: category.to_string(),
                    status: ApplicationStatus::Pending,
                })
                .collect(),
            active: Vec::new(),
        }
    }

    pub fn applications(&self) -> &[SellerApplication] {
        &self.applications
    }

    pub fn active_sellers(&self) -> &[ActiveSeller] {
        &self.active
    }

    pub fn pending_count(&self) -> usize {
        self.applications
            .iter()
            .filter(|a| a.status == ApplicationStatus::Pending)
            .count()
    }

    pub fn add_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SellerApplication {
        let app = SellerApplication {
            id: Uuid::new_v4().to_string(),
            name: pick(&COMPANIES, rng).to_string(),
            submitted: pick(&SUBMITTED, rng).to_string(),
            category: pick(&CATEGORIES, rng).to_string(),
            status: ApplicationStatus::Pending,
        };
        self.applications.insert(0, app.clone());
        self.prune_applications();
        app
    }

    fn prune_applications(&mut self) {
        while self.applications.len() > MAX_APPLICATIONS {
            let oldest_decided = self
                .applications
                .iter()
                .rposition(|a| a.status != ApplicationStatus::Pending);
            match oldest_decided {
                Some(idx) => {
                    self.applications.remove(idx);
                }
                None => {
                    self.applications.pop();
                }
            }
        }
    }

    /// Approve a pending application and onboard a seller for it.
    pub fn approve<R: Rng + ?Sized>(&mut self, id: &str, rng: &mut R) -> Option<ActiveSeller> {
        self.decide(id, ApplicationStatus::Approved)?;

        let sales = rng.gen_range(500_000..1_500_000);
        let seller = ActiveSeller {
            name: pick(&SELLER_NAMES, rng).to_string(),
            sales,
            commission: sales / 20,
        };
        self.active.insert(0, seller.clone());
        self.active.truncate(MAX_ACTIVE_SELLERS);
        Some(seller)
    }

    pub fn reject(&mut self, id: &str) -> Option<SellerApplication> {
        self.decide(id, ApplicationStatus::Rejected)
    }

    fn decide(&mut self, id: &str, status: ApplicationStatus) -> Option<SellerApplication> {
        let app = self
            .applications
            .iter_mut()
            .find(|a| a.id == id && a.status == ApplicationStatus::Pending)?;
        app.status = status;
        Some(app.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn seeded_queue_has_four_pending() {
        let q = ApplicationQueue::seeded();
        assert_eq!(q.pending_count(), 4);
        assert_eq!(q.applications()[0].name, "Fashion Hub India");
    }

    #[test]
    fn approve_and_reject_only_touch_pending() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut q = ApplicationQueue::seeded();

        let seller = q.approve("1", &mut rng).unwrap();
        assert_eq!(seller.commission, seller.sales / 20);
        assert!(SELLER_NAMES.contains(&seller.name.as_str()));
        assert_eq!(q.pending_count(), 3);
        assert_eq!(q.active_sellers().len(), 1);

        assert!(q.approve("1", &mut rng).is_none());
        assert!(q.reject("1").is_none());

        assert_eq!(q.reject("2").unwrap().status, ApplicationStatus::Rejected);
        assert_eq!(q.pending_count(), 2);
        assert!(q.reject("missing").is_none());
    }

    #[test]
    fn pending_count_never_goes_negative() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut q = ApplicationQueue::empty();
        assert!(q.approve("1", &mut rng).is_none());
        assert_eq!(q.pending_count(), 0);
    }

    #[test]
    fn new_applications_go_first() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut q = ApplicationQueue::seeded();
        let app = q.add_random(&mut rng);
        assert_eq!(q.applications()[0].id, app.id);
        assert!(COMPANIES.contains(&app.name.as_str()));
        assert!(CATEGORIES.contains(&app.category.as_str()));
        assert_eq!(q.pending_count(), 5);
    }

    #[test]
    fn queue_is_capped_dropping_decided_first() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut q = ApplicationQueue::seeded();
        q.approve("1", &mut rng).unwrap();

        for _ in 0..(MAX_APPLICATIONS - 3) {
            q.add_random(&mut rng);
        }
        assert_eq!(q.applications().len(), MAX_APPLICATIONS);
        assert!(q.applications().iter().all(|a| a.id != "1"));
        assert_eq!(q.pending_count(), MAX_APPLICATIONS);

        q.add_random(&mut rng);
        assert_eq!(q.applications().len(), MAX_APPLICATIONS);
        assert!(q.applications().iter().all(|a| a.id != "4"));
        assert!(q.applications().iter().any(|a| a.id == "3"));
    }

    #[test]
    fn active_sellers_are_capped() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut q = ApplicationQueue::empty();
        for _ in 0..(MAX_ACTIVE_SELLERS + 5) {
            let id = q.add_random(&mut rng).id;
            q.approve(&id, &mut rng).unwrap();
        }
        assert_eq!(q.active_sellers().len(), MAX_ACTIVE_SELLERS);
    }
}
