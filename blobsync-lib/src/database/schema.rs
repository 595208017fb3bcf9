table! {
    use diesel::sql_types::*;

    blobs (id) {
        id -> Int8,
        commitment -> Text,
        size -> Int8,
        height -> Int8,
        time -> Timestamptz,
        signer -> Text,
        content_type -> Text,
        namespace_id -> Text,
        tx_id -> Int8,
        tx_height -> Int8,
        tx_position -> Int4,
        tx_hash -> Text,
    }
}
