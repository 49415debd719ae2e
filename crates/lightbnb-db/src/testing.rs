//! Shared test data.
//!
//! ```text
//! users:        1 Eva (owner)   2 Louisa (guest)   3 Dominic (owner)
//!
//! id  owner  city              cost    reviews      avg
//! 1   1      Vancouver         15000   5, 4         4.5
//! 2   1      North Vancouver    8500   3            3.0
//! 3   3      Calgary           25000   4, 5         4.5
//! 4   3      Toronto           10099   2            2.0
//! 5   1      Savannah          30000   4            4.0
//! 6   3      Montreal           5000   -            NULL
//!
//! reservations (guest 2): 1..5 past (one per property 1..5), 6 in 2099
//! ```

use chrono::NaiveDate;
use lightbnb_core::{NewProperty, NewReservation, NewReview, NewUser};

use crate::{Database, DbConfig};

pub(crate) fn sample_property(owner_id: i64, city: &str, cost_per_night: i64) -> NewProperty {
    NewProperty {
        owner_id,
        title: format!("Stay in {city}"),
        description: "description".to_string(),
        thumbnail_photo_url: "https://images.example.com/thumb.jpg".to_string(),
        cover_photo_url: "https://images.example.com/cover.jpg".to_string(),
        cost_per_night,
        parking_spaces: 1,
        number_of_bathrooms: 1,
        number_of_bedrooms: 2,
        country: "Canada".to_string(),
        street: "1 Main St".to_string(),
        city: city.to_string(),
        province: "Somewhere".to_string(),
        post_code: "A1A 1A1".to_string(),
        active: true,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// In-memory database loaded with the dataset above.
pub(crate) async fn seeded_database() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    for (name, email) in [
        ("Eva Stanley", "eva@example.com"),
        ("Louisa Meyer", "louisa@example.com"),
        ("Dominic Parks", "dominic@example.com"),
    ] {
        db.users()
            .insert(&NewUser {
                name: name.to_string(),
                password: "password".to_string(),
                email: email.to_string(),
            })
            .await
            .unwrap();
    }

    for (owner_id, city, cost) in [
        (1, "Vancouver", 15000),
        (1, "North Vancouver", 8500),
        (3, "Calgary", 25000),
        (3, "Toronto", 10099),
        (1, "Savannah", 30000),
        (3, "Montreal", 5000),
    ] {
        db.properties()
            .insert(&sample_property(owner_id, city, cost))
            .await
            .unwrap();
    }

    for (property_id, start, end) in [
        (1, date(2018, 9, 11), date(2018, 9, 26)),
        (2, date(2019, 1, 4), date(2019, 2, 1)),
        (3, date(2019, 6, 1), date(2019, 6, 5)),
        (4, date(2019, 7, 1), date(2019, 7, 10)),
        (5, date(2020, 3, 1), date(2020, 3, 5)),
        (1, date(2099, 1, 1), date(2099, 1, 10)),
    ] {
        db.reservations()
            .insert(&NewReservation {
                start_date: start,
                end_date: end,
                property_id,
                guest_id: 2,
            })
            .await
            .unwrap();
    }

    for (property_id, reservation_id, rating) in
        [(1, 1, 5), (1, 1, 4), (2, 2, 3), (3, 3, 4), (3, 3, 5), (4, 4, 2), (5, 5, 4)]
    {
        db.reviews()
            .insert(&NewReview {
                guest_id: 2,
                property_id,
                reservation_id,
                rating,
                message: None,
            })
            .await
            .unwrap();
    }

    db
}
