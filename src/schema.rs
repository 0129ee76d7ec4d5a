table! {
    blogs (id) {
        id -> Varchar,
        title -> Varchar,
        content -> Varchar,
        date -> Varchar,
        user_id -> Varchar,
        comment_ids -> Array<Varchar>,
        created_at -> Timestamp,
    }
}

table! {
    comments (id) {
        id -> Varchar,
        text -> Varchar,
        date -> Varchar,
        user_id -> Varchar,
        blog_id -> Varchar,
        created_at -> Timestamp,
    }
}

table! {
    users (id) {
        id -> Varchar,
        name -> Varchar,
        email -> Varchar,
        password -> Varchar,
        blog_ids -> Array<Varchar>,
        comment_ids -> Array<Varchar>,
        created_at -> Timestamp,
    }
}

allow_tables_to_appear_in_same_query!(
    blogs,
    comments,
    users,
);
