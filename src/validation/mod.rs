//! Product form construction and validation rules.

use std::fmt;

use crate::domain::{CategoryId, ProductDraft, ProductId, ProductRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    CurrentPrice,
    Category,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::CurrentPrice => "currentprice",
            Field::Category => "idCat",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(Field),
    #[error("{0} must be a non-negative number")]
    OutOfRange(Field),
}

/// One field edit coming from the data-entry form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEdit {
    Name(String),
    Description(String),
    CurrentPrice(Option<f64>),
    Promotion(bool),
    Available(bool),
    Selected(bool),
    Category(Option<CategoryId>),
}

/// Working copy of a product bound to the data-entry form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    mode: FormMode,
    pub id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub current_price: Option<f64>,
    pub promotion: bool,
    pub selected: bool,
    pub available: bool,
    pub photo_name: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl ProductForm {
    /// Builds a form for `mode`, pre-populated from `product` when given.
    pub fn build(product: Option<&ProductRecord>, mode: FormMode) -> Self {
        match product {
            Some(p) => Self {
                mode,
                id: Some(p.id),
                name: p.name.clone(),
                description: p.description.clone(),
                current_price: Some(p.current_price),
                promotion: p.promotion,
                selected: p.selected,
                available: p.available,
                photo_name: p.photo_name.clone(),
                category_id: Some(p.category_id),
            },
            None => Self {
                mode,
                id: None,
                name: String::new(),
                description: String::new(),
                current_price: None,
                promotion: false,
                selected: false,
                available: true,
                photo_name: None,
                category_id: None,
            },
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// True when nothing has been entered yet.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.name.is_empty()
            && self.description.is_empty()
            && self.current_price.is_none()
            && self.category_id.is_none()
    }

    pub fn apply(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::Name(name) => self.name = name,
            FormEdit::Description(description) => self.description = description,
            FormEdit::CurrentPrice(price) => self.current_price = price,
            FormEdit::Promotion(promotion) => self.promotion = promotion,
            FormEdit::Available(available) => self.available = available,
            FormEdit::Selected(selected) => self.selected = selected,
            FormEdit::Category(category_id) => self.category_id = category_id,
        }
    }

    pub fn errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.mode == FormMode::Edit && self.id.is_none() {
            errors.push(FieldError::Required(Field::Id));
        }
        if self.name.trim().is_empty() {
            errors.push(FieldError::Required(Field::Name));
        }
        match self.current_price {
            None => errors.push(FieldError::Required(Field::CurrentPrice)),
            Some(price) if !price.is_finite() || price < 0.0 => {
                errors.push(FieldError::OutOfRange(Field::CurrentPrice))
            }
            Some(_) => {}
        }
        if self.category_id.is_none() {
            errors.push(FieldError::Required(Field::Category));
        }
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Snapshot of the form value, or the field errors blocking it.
    pub fn value(&self) -> Result<ProductDraft, Vec<FieldError>> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }
        // Both are checked by `errors()`.
        let (Some(current_price), Some(category_id)) = (self.current_price, self.category_id) else {
            return Err(errors);
        };
        Ok(ProductDraft {
            id: match self.mode {
                FormMode::Create => None,
                FormMode::Edit => self.id,
            },
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            current_price,
            promotion: self.promotion,
            selected: self.selected,
            available: self.available,
            photo_name: self.photo_name.clone(),
            category_id,
        })
    }
}
