//! The school menu, one description per (day, meal).

use shared::{DayMenu, MealSlot};
use std::sync::Arc;
use tracing::info;

use crate::backend::domain::directory_service::{not_found, require_manager};
use crate::backend::domain::errors::{ServiceError, ServiceResult};
use crate::backend::domain::models::menu::MenuEntry;
use crate::backend::domain::models::canonical_date;
use crate::backend::domain::models::user::UserAccount;
use crate::backend::storage::{Connection, MenuStorage};

#[derive(Clone)]
pub struct MenuService<C: Connection> {
    menu_repository: C::MenuRepository,
}

impl<C: Connection> MenuService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            menu_repository: connection.create_menu_repository(),
        }
    }

    /// Upsert the filled-in meals of the day together; blank meals are left untouched
    pub async fn save_day_menu(&self, actor: &UserAccount, menu: DayMenu) -> ServiceResult<DayMenu> {
        require_manager(actor)?;

        let date = canonical_date(&menu.date).ok_or_else(|| ServiceError::Invalid(format!("Invalid menu date '{}'", menu.date)))?;

        let meals: Vec<(MealSlot, String)> = MealSlot::ALL
            .iter()
            .filter_map(|slot| {
                menu.slot(*slot)
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(|d| (*slot, d.to_string()))
            })
            .collect();

        if meals.is_empty() {
            return Err(ServiceError::Invalid("Describe at least one meal".to_string()));
        }
        self.menu_repository.save_menu_day(&date, &meals).await?;
        info!("Saved {} meals for {}", meals.len(), date);

        let stored = self.list_menus().await?;
        stored
            .into_iter()
            .find(|day| day.date == date)
            .ok_or_else(|| not_found("Menu", &date))
    }

    /// Menus grouped per day, newest first
    pub async fn list_menus(&self) -> ServiceResult<Vec<DayMenu>> {
        let entries = self.menu_repository.list_menu_entries().await?;
        Ok(group_by_day(entries))
    }

    pub async fn delete_day_menu(&self, actor: &UserAccount, date: &str) -> ServiceResult<()> {
        require_manager(actor)?;

        let removed = self.menu_repository.delete_menu_day(date).await?;
        if removed == 0 {
            return Err(not_found("Menu", date));
        }
        info!("Deleted {} meals for {}", removed, date);
        Ok(())
    }
}

/// Fold entries sorted by date into one `DayMenu` per date, keeping order
fn group_by_day(entries: Vec<MenuEntry>) -> Vec<DayMenu> {
    let mut days: Vec<DayMenu> = Vec::new();

    for entry in entries {
        match days.last_mut() {
            Some(day) if day.date == entry.date => day.set_slot(entry.slot, entry.description),
            _ => {
                let mut day = DayMenu {
                    date: entry.date,
                    ..DayMenu::default()
                };
                day.set_slot(entry.slot, entry.description);
                days.push(day);
            }
        }
    }
    days
}
