//! Reply-keyboard menus
//!
//! Menu labels are matched exactly; see [`MenuAction::from_text`].

use teloxide::types::{KeyboardButton, KeyboardMarkup};
use crate::models::Collection;
use crate::utils::helpers::menu_rows;

pub const PRODUCTS: &str = "📦 Productos";
pub const CATEGORIES: &str = "📂 Categorías";
pub const POSTS: &str = "📰 Publicaciones";
pub const STATS: &str = "📊 Estadísticas";
pub const SETTINGS: &str = "⚙️ Configuración";
pub const HELP: &str = "🆘 Ayuda";
pub const BACK: &str = "🔙 Menú Principal";

pub const SYSTEM_INFO: &str = "ℹ️ Información Sistema";
pub const VERIFY: &str = "🔐 Verificar Acceso";
pub const REPORT: &str = "📈 Reporte Detallado";

pub const NEW_PRODUCT: &str = "📥 Nuevo Producto";
pub const LIST_PRODUCTS: &str = "📋 Listar Productos";
pub const EDIT_PRODUCT: &str = "✏️ Editar Producto";
pub const DELETE_PRODUCT: &str = "🗑️ Eliminar Producto";
pub const PRODUCT_STATS: &str = "📊 Estadísticas Productos";

pub const NEW_CATEGORY: &str = "🆕 Nueva Categoría";
pub const LIST_CATEGORIES: &str = "📋 Listar Categorías";
pub const EDIT_CATEGORY: &str = "✏️ Editar Categoría";
pub const DELETE_CATEGORY: &str = "🗑️ Eliminar Categoría";
pub const CATEGORY_BREAKDOWN: &str = "📊 Productos por Categoría";

pub const NEW_POST: &str = "🆕 Nueva Publicación";
pub const LIST_POSTS: &str = "📋 Listar Publicaciones";
pub const EDIT_POST: &str = "✏️ Editar Publicación";
pub const DELETE_POST: &str = "🗑️ Eliminar Publicación";
pub const POST_STATS: &str = "📊 Estadísticas Publicaciones";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    MainMenu,
    Section(Collection),
    New(Collection),
    List(Collection),
    Edit(Collection),
    Delete(Collection),
    /// Per-section statistics; categories show the product breakdown
    SectionStats(Collection),
    Stats,
    Settings,
    SystemInfo,
    Verify,
    Report,
    Help,
}

impl MenuAction {
    /// Map a keyboard label to its action
    pub fn from_text(text: &str) -> Option<Self> {
        let action = match text.trim() {
            BACK => MenuAction::MainMenu,
            PRODUCTS => MenuAction::Section(Collection::Products),
            CATEGORIES => MenuAction::Section(Collection::Categories),
            POSTS => MenuAction::Section(Collection::Posts),
            STATS => MenuAction::Stats,
            SETTINGS => MenuAction::Settings,
            HELP => MenuAction::Help,

            SYSTEM_INFO => MenuAction::SystemInfo,
            VERIFY => MenuAction::Verify,
            REPORT => MenuAction::Report,

            NEW_PRODUCT => MenuAction::New(Collection::Products),
            LIST_PRODUCTS => MenuAction::List(Collection::Products),
            EDIT_PRODUCT => MenuAction::Edit(Collection::Products),
            DELETE_PRODUCT => MenuAction::Delete(Collection::Products),
            PRODUCT_STATS => MenuAction::SectionStats(Collection::Products),

            NEW_CATEGORY => MenuAction::New(Collection::Categories),
            LIST_CATEGORIES => MenuAction::List(Collection::Categories),
            EDIT_CATEGORY => MenuAction::Edit(Collection::Categories),
            DELETE_CATEGORY => MenuAction::Delete(Collection::Categories),
            CATEGORY_BREAKDOWN => MenuAction::SectionStats(Collection::Categories),

            NEW_POST => MenuAction::New(Collection::Posts),
            LIST_POSTS => MenuAction::List(Collection::Posts),
            EDIT_POST => MenuAction::Edit(Collection::Posts),
            DELETE_POST => MenuAction::Delete(Collection::Posts),
            POST_STATS => MenuAction::SectionStats(Collection::Posts),

            _ => return None,
        };
        Some(action)
    }
}

fn keyboard(labels: &[&str], columns: usize) -> KeyboardMarkup {
    let rows = menu_rows(labels, columns)
        .into_iter()
        .map(|row| row.into_iter().map(KeyboardButton::new).collect())
        .collect::<Vec<Vec<KeyboardButton>>>();
    KeyboardMarkup::new(rows).resize_keyboard()
}

pub fn main_menu_labels() -> Vec<&'static str> {
    vec![PRODUCTS, CATEGORIES, POSTS, STATS, SETTINGS, HELP]
}

pub fn settings_labels() -> Vec<&'static str> {
    vec![SYSTEM_INFO, VERIFY, REPORT, BACK]
}

pub fn section_labels(collection: Collection) -> Vec<&'static str> {
    match collection {
        Collection::Products => vec![
            NEW_PRODUCT,
            LIST_PRODUCTS,
            EDIT_PRODUCT,
            DELETE_PRODUCT,
            PRODUCT_STATS,
            BACK,
        ],
        Collection::Categories => vec![
            NEW_CATEGORY,
            LIST_CATEGORIES,
            EDIT_CATEGORY,
            DELETE_CATEGORY,
            CATEGORY_BREAKDOWN,
            BACK,
        ],
        Collection::Posts => vec![NEW_POST, LIST_POSTS, EDIT_POST, DELETE_POST, POST_STATS, BACK],
    }
}

pub fn main_menu_keyboard() -> KeyboardMarkup {
    keyboard(&main_menu_labels(), 2)
}

pub fn section_keyboard(collection: Collection) -> KeyboardMarkup {
    keyboard(&section_labels(collection), 2)
}

pub fn settings_keyboard() -> KeyboardMarkup {
    keyboard(&settings_labels(), 2)
}

pub fn section_title(collection: Collection) -> &'static str {
    match collection {
        Collection::Products => "📦 Gestión de productos",
        Collection::Categories => "📂 Gestión de categorías",
        Collection::Posts => "📰 Gestión de publicaciones",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_label_maps_to_an_action() {
        for label in main_menu_labels().into_iter().chain(settings_labels()) {
            assert!(MenuAction::from_text(label).is_some(), "{label}");
        }
        for collection in Collection::ALL {
            for label in section_labels(collection) {
                assert!(MenuAction::from_text(label).is_some(), "{label}");
            }
        }
    }

    #[test]
    fn test_exact_matching() {
        assert_eq!(
            MenuAction::from_text("📥 Nuevo Producto"),
            Some(MenuAction::New(Collection::Products))
        );
        assert_eq!(MenuAction::from_text("nuevo producto"), None);
        assert_eq!(MenuAction::from_text("Huevos Blancos"), None);
    }

    #[test]
    fn test_every_section_has_its_stats() {
        for collection in Collection::ALL {
            let stats = section_labels(collection)
                .into_iter()
                .filter_map(MenuAction::from_text)
                .filter(|action| *action == MenuAction::SectionStats(collection))
                .count();
            assert_eq!(stats, 1, "{collection}");
        }
    }

    #[test]
    fn test_main_menu_rows() {
        let rows = menu_rows(&main_menu_labels(), 2);
        assert_eq!(rows[0], vec![PRODUCTS, CATEGORIES]);
        assert_eq!(rows[1], vec![POSTS, STATS]);
        assert_eq!(rows[2], vec![SETTINGS, HELP]);
        assert_eq!(MenuAction::from_text(SETTINGS), Some(MenuAction::Settings));
        assert_eq!(MenuAction::from_text(REPORT), Some(MenuAction::Report));
    }
}
