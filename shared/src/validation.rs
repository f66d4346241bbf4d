//! Request validation for the Salon Manager
//!
//! Every validator takes the raw payload and either returns a typed draft or
//! the complete set of field errors. Validators never stop at the first
//! problem. Messages are user-facing and written in French.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::*;
use crate::money::to_cents;
use crate::types::{normalize_text, FieldErrors};

// ============================================================================
// Field helpers
// ============================================================================

/// Name must be present and at least 2 characters once trimmed
fn required_name(errors: &mut FieldErrors, value: Option<String>) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(name) if name.chars().count() >= 2 => Some(name),
        _ => {
            errors.add("name", "Le nom doit comporter au moins 2 caractères");
            None
        }
    }
}

/// Optional e-mail address; must be well-formed when present
fn optional_email(errors: &mut FieldErrors, value: Option<String>) -> Option<String> {
    let email = normalize_text(value)?;
    if validator::validate_email(email.as_str()) {
        Some(email)
    } else {
        errors.add("email", "Adresse e-mail invalide");
        None
    }
}

/// Non-negative amount converted to cents
fn amount_cents(
    errors: &mut FieldErrors,
    field: &str,
    value: Decimal,
    message: &str,
) -> Option<i64> {
    match to_cents(value) {
        Some(cents) if cents >= 0 => Some(cents),
        _ => {
            errors.add(field, message);
            None
        }
    }
}

/// Positive identifier; zero and negative values count as missing
fn required_id(errors: &mut FieldErrors, field: &str, value: Option<i64>, message: &str) -> Option<i64> {
    let id = value.filter(|id| *id > 0);
    if id.is_none() {
        errors.add(field, message);
    }
    id
}

/// Accepts `YYYY-MM-DD`, or a date-time whose date part is kept
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(value).map(|dt| dt.date()))
}

// ============================================================================
// Inventory and purchasing
// ============================================================================

/// Validate a purchase payload
pub fn validate_purchase(input: PurchaseInput) -> Result<PurchaseDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let supplier_id = required_id(
        &mut errors,
        "supplier_id",
        input.supplier_id,
        "Le fournisseur est requis",
    );

    let purchase_date = match normalize_text(input.purchase_date) {
        None => {
            errors.add("purchase_date", "La date d'achat est requise");
            None
        }
        Some(raw) => {
            let parsed = parse_date(&raw);
            if parsed.is_none() {
                errors.add("purchase_date", "La date d'achat est invalide");
            }
            parsed
        }
    };

    let payment_method = match normalize_text(input.payment_method) {
        None => PaymentMethod::default(),
        Some(raw) => PaymentMethod::parse(&raw).unwrap_or_else(|| {
            errors.add("payment_method", "Méthode de paiement invalide");
            PaymentMethod::default()
        }),
    };

    let mut lines = Vec::new();
    match input.items {
        Some(items) if !items.is_empty() => {
            let mut total: i64 = 0;
            for (index, item) in items.into_iter().enumerate() {
                if let Some(line) = validate_purchase_item(&mut errors, index, item) {
                    match total.checked_add(line.subtotal_cents()) {
                        Some(t) => total = t,
                        None => errors.add("items", "Le montant total est trop élevé"),
                    }
                    lines.push(line);
                }
            }
            if stock_deltas(&lines).is_none() {
                errors.add("items", "La quantité totale d'un produit est trop élevée");
            }
        }
        _ => errors.add("items", "Au moins un produit est requis"),
    }

    match (supplier_id, purchase_date) {
        (Some(supplier_id), Some(purchase_date)) if errors.is_empty() => Ok(PurchaseDraft {
            supplier_id,
            purchase_date,
            payment_method,
            invoice_reference: normalize_text(input.invoice_reference),
            notes: normalize_text(input.notes),
            items: lines,
        }),
        _ => Err(errors),
    }
}

fn validate_purchase_item(
    errors: &mut FieldErrors,
    index: usize,
    item: PurchaseItemInput,
) -> Option<PurchaseLine> {
    let product_id = required_id(
        errors,
        &format!("items.{index}.product_id"),
        item.product_id,
        "Produit requis",
    );

    let quantity = item.quantity.filter(|q| *q > 0);
    if quantity.is_none() {
        errors.add(format!("items.{index}.quantity"), "Quantité invalide");
    }

    let price_field = format!("items.{index}.unit_price");
    let unit_price_cents = match item.unit_price {
        Some(price) => amount_cents(errors, &price_field, price, "Prix unitaire invalide"),
        None => {
            errors.add(price_field.clone(), "Prix unitaire invalide");
            None
        }
    };

    let (product_id, quantity, unit_price_cents) = (product_id?, quantity?, unit_price_cents?);
    if quantity.checked_mul(unit_price_cents).is_none() {
        errors.add(price_field, "Le montant de la ligne est trop élevé");
        return None;
    }

    Some(PurchaseLine {
        product_id,
        quantity,
        unit_price_cents,
    })
}

/// Validate a product payload
pub fn validate_product(input: ProductInput) -> Result<ProductDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required_name(&mut errors, input.name);

    let category = input.category.as_deref().and_then(ProductCategory::parse);
    if category.is_none() {
        errors.add("category", "Catégorie invalide");
    }

    let purchase_price_message = "Le prix d'achat doit être un nombre positif";
    let purchase_price_cents = match input.purchase_price {
        Some(price) => amount_cents(&mut errors, "purchase_price", price, purchase_price_message),
        None => {
            errors.add("purchase_price", purchase_price_message);
            None
        }
    };

    let sale_price_cents = input.sale_price.and_then(|price| {
        amount_cents(
            &mut errors,
            "sale_price",
            price,
            "Le prix de vente doit être un nombre positif",
        )
    });

    let stock_quantity = input.stock_quantity.unwrap_or(0);
    if stock_quantity < 0 {
        errors.add("stock_quantity", "La quantité en stock doit être positive");
    }

    let alert_threshold = input.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD);
    if alert_threshold < 0 {
        errors.add("alert_threshold", "Le seuil d'alerte doit être positif");
    }

    match (name, category, purchase_price_cents) {
        (Some(name), Some(category), Some(purchase_price_cents)) if errors.is_empty() => {
            Ok(ProductDraft {
                name,
                category,
                supplier_id: input.supplier_id.filter(|id| *id > 0),
                purchase_price_cents,
                sale_price_cents,
                stock_quantity,
                alert_threshold,
                unit: normalize_text(input.unit).unwrap_or_else(|| DEFAULT_UNIT.to_string()),
                notes: normalize_text(input.notes),
            })
        }
        _ => Err(errors),
    }
}

/// Validate a direct stock adjustment
pub fn validate_stock_adjustment(
    input: StockAdjustmentInput,
) -> Result<StockAdjustmentDraft, FieldErrors> {
    match input.quantity {
        Some(delta) if delta != 0 => Ok(StockAdjustmentDraft {
            delta,
            reason: normalize_text(input.reason),
        }),
        _ => Err(FieldErrors::single(
            "quantity",
            "La quantité doit être un entier non nul",
        )),
    }
}

// ============================================================================
// Contacts
// ============================================================================

/// Validate a supplier payload
pub fn validate_supplier(input: SupplierInput) -> Result<SupplierDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required_name(&mut errors, input.name);
    let email = optional_email(&mut errors, input.email);

    let phone = normalize_text(input.phone);
    if phone.as_ref().is_some_and(|p| p.chars().count() < 6) {
        errors.add(
            "phone",
            "Le téléphone doit comporter au moins 6 caractères lorsque fourni",
        );
    }

    match name {
        Some(name) if errors.is_empty() => Ok(SupplierDraft {
            name,
            phone,
            email,
            notes: normalize_text(input.notes),
        }),
        _ => Err(errors),
    }
}

/// Validate a client payload
pub fn validate_client(input: ClientInput) -> Result<ClientDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required_name(&mut errors, input.name);
    let email = optional_email(&mut errors, input.email);

    let phone = normalize_text(input.phone).filter(|p| p.chars().count() >= 6);
    if phone.is_none() {
        errors.add("phone", "Le numéro de téléphone est requis");
    }

    match (name, phone) {
        (Some(name), Some(phone)) if errors.is_empty() => Ok(ClientDraft {
            name,
            phone,
            email,
            notes: normalize_text(input.notes),
        }),
        _ => Err(errors),
    }
}

// ============================================================================
// Services, appointments and invoices
// ============================================================================

/// Validate a salon service payload
pub fn validate_salon_service(input: SalonServiceInput) -> Result<SalonServiceDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required_name(&mut errors, input.name);

    let price_message = "Le prix doit être un nombre positif";
    let price_cents = match input.price {
        Some(price) => amount_cents(&mut errors, "price", price, price_message),
        None => {
            errors.add("price", price_message);
            None
        }
    };

    let duration_minutes = input.duration_minutes.filter(|d| *d > 0);
    if duration_minutes.is_none() {
        errors.add(
            "duration_minutes",
            "La durée doit être un nombre de minutes positif",
        );
    }

    match (name, price_cents, duration_minutes) {
        (Some(name), Some(price_cents), Some(duration_minutes)) if errors.is_empty() => {
            Ok(SalonServiceDraft {
                name,
                price_cents,
                duration_minutes,
            })
        }
        _ => Err(errors),
    }
}

/// Validate an appointment payload
pub fn validate_appointment(input: AppointmentInput) -> Result<AppointmentDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let client_id = required_id(&mut errors, "client_id", input.client_id, "Le client est requis");
    let service_id = required_id(
        &mut errors,
        "service_id",
        input.service_id,
        "La prestation est requise",
    );

    let scheduled_at = input.scheduled_at.as_deref().and_then(parse_datetime);
    if scheduled_at.is_none() {
        errors.add("scheduled_at", "Une date et une heure valides sont requises");
    }

    let price_cents = input.price.and_then(|price| {
        amount_cents(&mut errors, "price", price, "Le prix doit être un nombre positif")
    });

    match (client_id, service_id, scheduled_at) {
        (Some(client_id), Some(service_id), Some(scheduled_at)) if errors.is_empty() => {
            Ok(AppointmentDraft {
                client_id,
                service_id,
                scheduled_at,
                price_cents,
                notes: normalize_text(input.notes),
            })
        }
        _ => Err(errors),
    }
}

/// Validate an invoice payload
pub fn validate_invoice(input: InvoiceInput) -> Result<InvoiceDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let appointment_id = required_id(
        &mut errors,
        "appointment_id",
        input.appointment_id,
        "Le rendez-vous est requis",
    );

    let total_cents = input.total.and_then(|total| {
        amount_cents(&mut errors, "total", total, "Le total doit être un nombre positif")
    });

    let status = match normalize_text(input.status) {
        None => InvoiceStatus::default(),
        Some(raw) => InvoiceStatus::parse(&raw).unwrap_or_else(|| {
            errors.add("status", "Le statut doit être paid ou unpaid");
            InvoiceStatus::default()
        }),
    };

    match appointment_id {
        Some(appointment_id) if errors.is_empty() => Ok(InvoiceDraft {
            appointment_id,
            total_cents,
            status,
        }),
        _ => Err(errors),
    }
}
