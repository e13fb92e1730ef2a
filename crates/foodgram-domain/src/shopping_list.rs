//! Shopping-list aggregation over the ingredient lines of carted recipes.

use std::collections::HashMap;

/// Title line of the downloadable purchase list.
pub const SHOPPING_LIST_TITLE: &str = "Shopping list";

/// One ingredient line of a carted recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub ingredient: String,
    pub measurement_unit: String,
    pub amount: i64,
}

impl CartLine {
    pub fn new(ingredient: impl Into<String>, measurement_unit: impl Into<String>, amount: i64) -> Self {
        Self {
            ingredient: ingredient.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }

    /// `"<ingredient> (<unit>)"`, the grouping key.
    pub fn key(&self) -> String {
        format!("{} ({})", self.ingredient, self.measurement_unit)
    }
}

/// Amounts summed per ingredient + unit, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    entries: Vec<(String, i64)>,
    positions: HashMap<String, usize>,
}

impl ShoppingList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, line: &CartLine) {
        let key = line.key();
        match self.positions.get(&key) {
            Some(&idx) => self.entries[idx].1 += line.amount,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, line.amount));
            }
        }
    }

    pub fn entries(&self) -> &[(String, i64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `"<key> - <amount>"` per entry.
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(key, amount)| format!("{key} - {amount}"))
            .collect()
    }

    /// Plain-text document: title, blank line, one line per entry.
    pub fn render_text(&self) -> String {
        let mut out = format!("{SHOPPING_LIST_TITLE}\n\n");
        for line in self.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl<'a> FromIterator<&'a CartLine> for ShoppingList {
    fn from_iter<I: IntoIterator<Item = &'a CartLine>>(iter: I) -> Self {
        let mut list = Self::new();
        for line in iter {
            list.add(line);
        }
        list
    }
}

impl FromIterator<CartLine> for ShoppingList {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        let mut list = Self::new();
        for line in iter {
            list.add(&line);
        }
        list
    }
}
