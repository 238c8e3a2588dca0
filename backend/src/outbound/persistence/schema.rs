//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Lessor organisations.
    tenants (id) {
        id -> Text,
        name -> Text,
        /// Unique routing key under the platform root domain.
        subdomain -> Text,
        domain -> Text,
        plan -> Text,
        status -> Text,
        owner_email -> Text,
        /// SHA-256 hex of the owner key; the key itself is never stored.
        owner_key_digest -> Text,
        primary_color -> Text,
        logo_url -> Nullable<Text>,
        trial_end_date -> Timestamptz,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tenant pages. `(tenant_id, slug)` is unique.
    pages (id) {
        id -> Uuid,
        tenant_id -> Text,
        slug -> Text,
        title -> Text,
        meta_description -> Nullable<Text>,
        is_published -> Bool,
        published_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blocks of a page, deleted with their page.
    page_blocks (id) {
        id -> Uuid,
        page_id -> Uuid,
        block_type -> Text,
        position -> Int4,
        config -> Jsonb,
        /// Insertion order within the page.
        ordinal -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    vehicles (id) {
        id -> Uuid,
        tenant_id -> Text,
        make -> Text,
        model -> Text,
        year -> Nullable<Int4>,
        license_plate -> Text,
        vin -> Nullable<Text>,
        daily_rate -> Nullable<Int8>,
        mileage_limit -> Nullable<Int4>,
        availability_status -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    bookings (id) {
        id -> Uuid,
        tenant_id -> Text,
        vehicle_id -> Uuid,
        customer_name -> Text,
        customer_email -> Text,
        customer_phone -> Text,
        start_date -> Date,
        end_date -> Date,
        status -> Text,
        daily_rate -> Nullable<Int8>,
        total_price -> Nullable<Int8>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    invoices (id) {
        id -> Uuid,
        tenant_id -> Text,
        booking_id -> Nullable<Uuid>,
        invoice_number -> Text,
        customer_name -> Text,
        customer_email -> Text,
        amount -> Int8,
        tax_amount -> Int8,
        discount_amount -> Int8,
        total_amount -> Int8,
        description -> Nullable<Text>,
        issued_date -> Date,
        due_date -> Date,
        status -> Text,
        payment_method -> Nullable<Text>,
        paid_date -> Nullable<Date>,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(page_blocks -> pages (page_id));

diesel::allow_tables_to_appear_in_same_query!(
    tenants,
    pages,
    page_blocks,
    vehicles,
    bookings,
    invoices,
);
