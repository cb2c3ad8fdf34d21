//! Test fixtures and sample data

use readywall_client::ImageUpload;
use readywall_client::entities::{LeadDraft, ProductDraft};
use serde_json::{Value, json};

/// Lead as the gateway returns it
pub fn lead_json(id: &str, name: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "phone": "9999999999",
        "company": format!("{name} Builders"),
        "projectType": "residential",
        "projectSize": "medium",
        "location": {"address": "1 Main St", "city": "Pune", "state": "MH", "pincode": "411001"},
        "requirements": "Compound wall",
        "timeline": "immediate",
        "status": status,
        "createdAt": "2024-03-15T14:25:30Z"
    })
}

/// Product as the gateway returns it
pub fn product_json(id: &str, name: &str, category: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": format!("{name} for driveways"),
        "category": category,
        "unit": "sqft",
        "price": 45,
        "stock": 1500,
        "isAvailable": true,
        "images": [format!("{id}-1.jpg"), format!("{id}-2.jpg")],
        "specifications": {"dimensions": {"length": 200, "width": 100, "height": 80, "unit": "mm"}}
    })
}

/// User as the gateway returns it
pub fn user_json(id: &str, name: &str, is_active: bool) -> Value {
    json!({
        "_id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "role": "customer",
        "isActive": is_active,
        "createdAt": "2024-01-02T09:00:00Z"
    })
}

/// Inquiry as the gateway returns it
pub fn inquiry_json(id: &str, first_name: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "firstName": first_name,
        "lastName": "Shah",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "phone": "9000000000",
        "productInterest": "pavers",
        "message": "Need a quote",
        "status": status
    })
}

/// Lead draft that passes validation
pub fn complete_lead_draft() -> LeadDraft {
    LeadDraft {
        name: "Kiran Patel".to_string(),
        email: "kiran@example.com".to_string(),
        phone: "9888888888".to_string(),
        company: "Patel Infra".to_string(),
        project_type: "commercial".to_string(),
        project_size: "large".to_string(),
        address: "5 Ring Road".to_string(),
        city: "Surat".to_string(),
        state: "GJ".to_string(),
        pincode: "395003".to_string(),
        requirements: "Boundary wall".to_string(),
        timeline: "1-3months".to_string(),
    }
}

/// Product draft that passes validation except, optionally, for images
pub fn product_draft(with_image: bool) -> ProductDraft {
    ProductDraft {
        name: "Zig-zag Paver".to_string(),
        description: "80mm interlocking paver".to_string(),
        category: "pavers".to_string(),
        unit: "sqft".to_string(),
        price: "52".to_string(),
        stock: "900".to_string(),
        images: if with_image {
            vec![ImageUpload::from_bytes("paver.jpg", "image/jpeg", b"jpeg-bytes".to_vec())]
        } else {
            Vec::new()
        },
        ..ProductDraft::default()
    }
}
