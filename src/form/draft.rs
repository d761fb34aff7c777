use crate::error::ValidationError;
use crate::models::{Product, ProductPayload};
use crate::utils::split_list;

/// Editable product fields as typed by the user. Price and the list
/// fields stay raw text until validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub in_stock: bool,
    pub ingredients: String,
    pub benefits: String,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            price: String::new(),
            category: String::new(),
            in_stock: true,
            ingredients: String::new(),
            benefits: String::new(),
        }
    }
}

impl ProductDraft {
    pub fn from_product(p: &Product) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price.to_string(),
            category: p.category.clone(),
            in_stock: p.in_stock,
            ingredients: p.ingredients.join(", "),
            benefits: p.benefits.join(", "),
        }
    }

    /// Checks required fields and the price, returning the payload to send
    /// (without an image).
    pub fn validate(&self) -> Result<ProductPayload, ValidationError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.description.trim().is_empty() {
            missing.push("description");
        }
        if self.price.trim().is_empty() {
            missing.push("price");
        }
        if self.category.trim().is_empty() {
            missing.push("category");
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let price: f64 = self
            .price
            .trim()
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite())
            .ok_or_else(|| ValidationError::InvalidPrice(self.price.clone()))?;
        if price < 0.0 {
            return Err(ValidationError::NegativePrice);
        }

        Ok(ProductPayload {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            category: self.category.trim().to_string(),
            in_stock: self.in_stock,
            ingredients: split_list(&self.ingredients),
            benefits: split_list(&self.benefits),
            image: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ProductDraft {
        ProductDraft {
            name: "Aloe Gel".into(),
            description: "Soothing".into(),
            price: "10.50".into(),
            category: "Face Care".into(),
            in_stock: true,
            ingredients: "Aloe Vera, , Vitamin E".into(),
            benefits: String::new(),
        }
    }

    #[test]
    fn valid_draft_becomes_payload() {
        let payload = filled().validate().unwrap();
        assert_eq!(payload.price, 10.5);
        assert_eq!(payload.ingredients, vec!["Aloe Vera", "Vitamin E"]);
        assert!(payload.benefits.is_empty());
        assert!(payload.image.is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut draft = filled();
        draft.name = "   ".into();
        assert_eq!(draft.validate(), Err(ValidationError::MissingFields(vec!["name"])));
    }

    #[test]
    fn every_missing_field_is_reported() {
        let err = ProductDraft::default().validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec!["name", "description", "price", "category"])
        );
    }

    #[test]
    fn price_must_be_a_non_negative_number() {
        let mut draft = filled();
        draft.price = "ten".into();
        assert!(matches!(draft.validate(), Err(ValidationError::InvalidPrice(_))));
        draft.price = "NaN".into();
        assert!(matches!(draft.validate(), Err(ValidationError::InvalidPrice(_))));
        draft.price = "-1".into();
        assert_eq!(draft.validate(), Err(ValidationError::NegativePrice));
        draft.price = "0".into();
        assert_eq!(draft.validate().unwrap().price, 0.0);
    }

    #[test]
    fn default_draft_is_in_stock() {
        assert!(ProductDraft::default().in_stock);
    }
}
