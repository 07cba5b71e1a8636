//! Shared UI icons.

use console::Emoji;

pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[WARN]");
pub static KEY: Emoji<'_, '_> = Emoji("🔑 ", "");
pub static PEOPLE: Emoji<'_, '_> = Emoji("👥 ", "");
pub static BASKET: Emoji<'_, '_> = Emoji("🧺 ", "");
pub static TAG: Emoji<'_, '_> = Emoji("🏷️  ", "");
