// ============================================================================
// Internationalisation et thème
// ============================================================================
// Libellés de l'interface en trois langues (en/th/jp) et palette de couleurs
// claire/sombre. La langue et le thème sont des valeurs explicites portées
// par App et passées au rendu : pas d'état global mutable.
//
// CONCEPTS RUST :
// 1. Enum + méthode labels() : dispatch statique vers des &'static Labels
// 2. Cycle d'états : next() pour changer de langue avec une touche
// ============================================================================

use ratatui::style::Color;

/// Langue de l'interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lang {
    #[default]
    En,
    Th,
    Jp,
}

/// Libellés de l'interface pour une langue
#[derive(Debug)]
pub struct Labels {
    pub flag: &'static str,
    pub title: &'static str,
    pub search: &'static str,
    pub converter: &'static str,
    pub swap: &'static str,
    pub historical: &'static str,
    pub days7: &'static str,
    pub days30: &'static str,
    pub year1: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub result: &'static str,
    pub col_currency: &'static str,
    pub col_country: &'static str,
    pub col_flag: &'static str,
    pub col_rate: &'static str,
    pub no_data: &'static str,
    pub source: &'static str,
}

const EN: Labels = Labels {
    flag: "🇺🇸",
    title: "World Currency Exchange Rates",
    search: "Search currency or country...",
    converter: "Currency Converter",
    swap: "Swap",
    historical: "Historical Exchange Rate",
    days7: "7 days",
    days30: "30 days",
    year1: "1 year",
    from: "From",
    to: "To",
    result: "Result",
    col_currency: "Currency",
    col_country: "Country",
    col_flag: "Flag",
    col_rate: "1 USD",
    no_data: "No data found",
    source: "Data from ExchangeRate-API",
};

const TH: Labels = Labels {
    flag: "🇹🇭",
    title: "อัตราแลกเปลี่ยนเงินตราทั่วโลก",
    search: "ค้นหาสกุลเงิน หรือประเทศ...",
    converter: "ตัวแปลงเงินตรา",
    swap: "สลับ",
    historical: "กราฟอัตราแลกเปลี่ยนย้อนหลัง",
    days7: "7 วัน",
    days30: "30 วัน",
    year1: "1 ปี",
    from: "จาก",
    to: "เป็น",
    result: "ผลลัพธ์",
    col_currency: "สกุลเงิน",
    col_country: "ประเทศ",
    col_flag: "ธง",
    col_rate: "1 USD",
    no_data: "ไม่พบข้อมูล",
    source: "ข้อมูลจาก ExchangeRate-API",
};

const JP: Labels = Labels {
    flag: "🇯🇵",
    title: "世界の為替レート",
    search: "通貨または国を検索...",
    converter: "通貨コンバーター",
    swap: "入れ替え",
    historical: "為替レート履歴グラフ",
    days7: "7日間",
    days30: "30日間",
    year1: "1年",
    from: "から",
    to: "へ",
    result: "結果",
    col_currency: "通貨",
    col_country: "国",
    col_flag: "国旗",
    col_rate: "1 USD",
    no_data: "データが見つかりません",
    source: "データ元: ExchangeRate-API",
};

impl Lang {
    /// Libellés de cette langue
    pub fn labels(&self) -> &'static Labels {
        match self {
            Lang::En => &EN,
            Lang::Th => &TH,
            Lang::Jp => &JP,
        }
    }

    /// Langue suivante (cycle en -> th -> jp -> en, touche L)
    pub fn next(&self) -> Self {
        match self {
            Lang::En => Lang::Th,
            Lang::Th => Lang::Jp,
            Lang::Jp => Lang::En,
        }
    }

    /// Clé de traduction restcountries (ISO 639-3) pour les noms de pays
    ///
    /// None pour l'anglais : le nom commun est déjà en anglais. Quand le
    /// provider ne fournit pas la traduction demandée, on retombe sur le
    /// nom commun.
    pub fn translation_key(&self) -> Option<&'static str> {
        match self {
            Lang::En => None,
            Lang::Th => Some("tha"),
            Lang::Jp => Some("jpn"),
        }
    }
}

// ============================================================================
// Thème
// ============================================================================

/// Thème de couleurs de l'interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Bascule clair <-> sombre (touche d)
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Couleur du texte principal
    pub fn fg(&self) -> Color {
        match self {
            Theme::Dark => Color::White,
            Theme::Light => Color::Black,
        }
    }

    /// Couleur des bordures et titres
    pub fn accent(&self) -> Color {
        match self {
            Theme::Dark => Color::Cyan,
            Theme::Light => Color::Blue,
        }
    }

    /// Couleur des taux (colonne "1 USD")
    pub fn rate(&self) -> Color {
        Color::Yellow
    }

    /// Couleur du texte secondaire (placeholders, aide)
    pub fn dim(&self) -> Color {
        match self {
            Theme::Dark => Color::Gray,
            Theme::Light => Color::DarkGray,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_cycle() {
        let mut lang = Lang::En;
        lang = lang.next();
        assert_eq!(lang, Lang::Th);
        lang = lang.next();
        assert_eq!(lang, Lang::Jp);
        lang = lang.next();
        assert_eq!(lang, Lang::En);
    }

    #[test]
    fn test_english_has_no_translation_key() {
        assert_eq!(Lang::En.translation_key(), None);
        assert_eq!(Lang::Jp.translation_key(), Some("jpn"));
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggle(), Theme::Light);
        assert_eq!(Theme::Light.toggle(), Theme::Dark);
    }
}
