//! The fixed car-rental schema and demonstration data set.
//!
//! Tables and rows are kept as typed literal data and rendered to statement
//! text per engine, so the same three scripts run on every backend.

use crate::db::{ColumnType, DatabaseType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Drop,
    Create,
    Seed,
}

impl Script {
    /// Statements in execution order for the given engine.
    pub fn statements(self, db: DatabaseType) -> Vec<String> {
        match self {
            Script::Drop => DROP_ORDER.iter().map(|table| db.drop_table(table)).collect(),
            Script::Create => TABLES.iter().map(|table| table.create_sql(db)).collect(),
            Script::Seed => SEED.iter().map(|insert| insert.insert_sql(db)).collect(),
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Script::Drop => "Tables dropped successfully (or they did not exist).",
            Script::Create => "Tables created successfully.",
            Script::Seed => "Tables populated successfully.",
        }
    }
}

pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

pub struct ForeignKey {
    pub column: &'static str,
    pub parent: &'static str,
    pub parent_column: &'static str,
}

/// The first column is the primary key.
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
}

impl TableDef {
    pub fn primary_key(&self) -> &'static str {
        self.columns[0].name
    }

    fn create_sql(&self, db: DatabaseType) -> String {
        let mut lines: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let pk = if i == 0 { " PRIMARY KEY" } else { "" };
                format!("  {} {}{pk}", col.name, db.column_type(col.ty))
            })
            .collect();
        lines.extend(self.foreign_keys.iter().map(|fk| {
            format!(
                "  FOREIGN KEY ({}) REFERENCES {} ({})",
                fk.column, fk.parent, fk.parent_column
            )
        }));
        format!("CREATE TABLE {} (\n{}\n)", self.name, lines.join(",\n"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    /// Kept as text so the engine sees exactly `50.00`.
    Decimal(&'static str),
    Text(&'static str),
    /// ISO `YYYY-MM-DD`, converted by the engine's date function.
    Date(&'static str),
}

impl Literal {
    fn render(&self, db: DatabaseType) -> String {
        match self {
            Literal::Int(i) => i.to_string(),
            Literal::Decimal(d) => d.to_string(),
            Literal::Text(t) => format!("'{}'", t.replace('\'', "''")),
            Literal::Date(iso) => db.date_literal(iso),
        }
    }
}

pub struct Insert {
    pub table: &'static str,
    pub values: &'static [Literal],
}

impl Insert {
    pub fn table_def(&self) -> Option<&'static TableDef> {
        TABLES.iter().find(|t| t.name == self.table)
    }

    /// Value of `column`, matched positionally against the table definition.
    pub fn value(&self, column: &str) -> Option<Literal> {
        let table = self.table_def()?;
        let idx = table.columns.iter().position(|c| c.name == column)?;
        self.values.get(idx).copied()
    }

    fn insert_sql(&self, db: DatabaseType) -> String {
        let columns = self
            .table_def()
            .map(|t| t.columns.iter().map(|c| c.name).collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        let values = self
            .values
            .iter()
            .map(|v| v.render(db))
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT INTO {} ({columns}) VALUES ({values})", self.table)
    }
}

/// Children before parents.
pub const DROP_ORDER: &[&str] = &[
    "BILLING_INFORMATION",
    "RENTAL_RECORDS",
    "MAINTENANCE",
    "CAR_INFORMATION",
    "CUSTOMER_INFORMATION",
    "BRANCH_INFORMATION",
];

const INT: ColumnType = ColumnType::Int;
const MONEY: ColumnType = ColumnType::Decimal { precision: 10, scale: 2 };
const DATE: ColumnType = ColumnType::Date;

const fn varchar(len: u16) -> ColumnType {
    ColumnType::Varchar(len)
}

const fn col(name: &'static str, ty: ColumnType) -> Column {
    Column { name, ty }
}

const fn fk(column: &'static str, parent: &'static str, parent_column: &'static str) -> ForeignKey {
    ForeignKey { column, parent, parent_column }
}

/// Parents before children.
pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "BRANCH_INFORMATION",
        columns: &[
            col("Branch_ID", INT),
            col("Name", varchar(100)),
            col("Address", varchar(255)),
            col("City", varchar(100)),
            col("Phone_Number", varchar(15)),
            col("Email", varchar(100)),
        ],
        foreign_keys: &[],
    },
    TableDef {
        name: "CAR_INFORMATION",
        columns: &[
            col("Car_ID", INT),
            col("Branch_ID", INT),
            col("Make", varchar(50)),
            col("Model", varchar(50)),
            col("Year_Of_Manufacture", INT),
            col("Colour", varchar(30)),
            col("Number_Of_Seats", INT),
            col("Per_Day_Rental_Price", MONEY),
        ],
        foreign_keys: &[fk("Branch_ID", "BRANCH_INFORMATION", "Branch_ID")],
    },
    TableDef {
        name: "CUSTOMER_INFORMATION",
        columns: &[
            col("Customer_ID", INT),
            col("First_Name", varchar(100)),
            col("Last_Name", varchar(100)),
            col("Date_Of_Birth", DATE),
            col("Email", varchar(100)),
            col("Phone_Number", varchar(15)),
        ],
        foreign_keys: &[],
    },
    TableDef {
        name: "RENTAL_RECORDS",
        columns: &[
            col("Rental_ID", INT),
            col("Customer_ID", INT),
            col("Car_ID", INT),
            col("Pickup_Branch_ID", INT),
            col("Dropoff_Branch_ID", INT),
            col("Pickup_Date", DATE),
            col("Dropoff_Date", DATE),
        ],
        foreign_keys: &[
            fk("Customer_ID", "CUSTOMER_INFORMATION", "Customer_ID"),
            fk("Car_ID", "CAR_INFORMATION", "Car_ID"),
            fk("Pickup_Branch_ID", "BRANCH_INFORMATION", "Branch_ID"),
            fk("Dropoff_Branch_ID", "BRANCH_INFORMATION", "Branch_ID"),
        ],
    },
    TableDef {
        name: "BILLING_INFORMATION",
        columns: &[
            col("Payment_ID", INT),
            col("Customer_ID", INT),
            col("Rental_ID", INT),
            col("Amount", MONEY),
            col("Payment_Date", DATE),
            col("Card_Number", varchar(20)),
        ],
        foreign_keys: &[
            fk("Customer_ID", "CUSTOMER_INFORMATION", "Customer_ID"),
            fk("Rental_ID", "RENTAL_RECORDS", "Rental_ID"),
        ],
    },
    TableDef {
        name: "MAINTENANCE",
        columns: &[
            col("Maintenance_ID", INT),
            col("Car_ID", INT),
            col("Maintenance_Date", DATE),
            col("Description", varchar(255)),
            col("Estimate_Cost", MONEY),
        ],
        foreign_keys: &[fk("Car_ID", "CAR_INFORMATION", "Car_ID")],
    },
];

use Literal::{Date as D, Decimal as N, Int as I, Text as T};

const BRANCH: &str = "BRANCH_INFORMATION";
const CAR: &str = "CAR_INFORMATION";
const CUSTOMER: &str = "CUSTOMER_INFORMATION";
const RENTAL: &str = "RENTAL_RECORDS";
const BILLING: &str = "BILLING_INFORMATION";
const MAINTENANCE: &str = "MAINTENANCE";

// demo card number, not a real account
const CARD: Literal = T("4111111111111111");

/// Demonstration rows; every foreign key points at a row listed earlier.
#[rustfmt::skip]
pub const SEED: &[Insert] = &[
    Insert { table: BRANCH, values: &[I(1), T("Downtown Branch"), T("123 Main Street"), T("Toronto"), T("416-555-1234"), T("downtown@carrentals.com")] },
    Insert { table: BRANCH, values: &[I(2), T("Airport Branch"), T("456 Airport Road"), T("Toronto"), T("416-555-5678"), T("airport@carrentals.com")] },
    Insert { table: BRANCH, values: &[I(3), T("Midtown Branch"), T("789 Midtown Avenue"), T("New York"), T("212-555-8765"), T("midtown@carrentals.com")] },
    Insert { table: BRANCH, values: &[I(4), T("Eastside Branch"), T("321 Eastside Blvd"), T("Toronto"), T("416-555-2222"), T("eastside@carrentals.com")] },
    Insert { table: BRANCH, values: &[I(5), T("Uptown Branch"), T("123 Uptown Drive"), T("New York"), T("212-555-8765"), T("uptown@carrentals.com")] },
    Insert { table: BRANCH, values: &[I(6), T("Westside Branch"), T("987 Westside Road"), T("Vancouver"), T("604-555-4321"), T("westside@carrentals.com")] },

    Insert { table: CAR, values: &[I(1), I(1), T("Toyota"), T("Camry"), I(2020), T("Red"), I(5), N("50.00")] },
    Insert { table: CAR, values: &[I(2), I(1), T("Honda"), T("Civic"), I(2019), T("Blue"), I(5), N("45.00")] },
    Insert { table: CAR, values: &[I(3), I(2), T("Ford"), T("Mustang"), I(2021), T("Black"), I(4), N("80.00")] },
    Insert { table: CAR, values: &[I(4), I(3), T("BMW"), T("X5"), I(2022), T("White"), I(5), N("100.00")] },
    Insert { table: CAR, values: &[I(5), I(1), T("Chevrolet"), T("Malibu"), I(2021), T("Silver"), I(5), N("55.00")] },
    Insert { table: CAR, values: &[I(6), I(2), T("Hyundai"), T("Elantra"), I(2022), T("Gray"), I(5), N("48.00")] },
    Insert { table: CAR, values: &[I(7), I(3), T("Mercedes"), T("C-Class"), I(2023), T("Black"), I(5), N("120.00")] },
    Insert { table: CAR, values: &[I(8), I(4), T("Nissan"), T("Altima"), I(2019), T("Blue"), I(5), N("60.00")] },
    Insert { table: CAR, values: &[I(9), I(5), T("Mazda"), T("CX-5"), I(2020), T("Red"), I(5), N("75.00")] },
    Insert { table: CAR, values: &[I(10), I(6), T("Audi"), T("RS-5"), I(2023), T("Red"), I(3), N("95.00")] },

    Insert { table: CUSTOMER, values: &[I(1), T("John"), T("Doe"), D("1990-06-15"), T("john.doe@example.com"), T("416-555-6789")] },
    Insert { table: CUSTOMER, values: &[I(2), T("Jane"), T("Smith"), D("1985-03-22"), T("jane.smith@example.com"), T("416-555-1234")] },
    Insert { table: CUSTOMER, values: &[I(3), T("Emily"), T("Johnson"), D("1995-11-10"), T("emily.johnson@example.com"), T("905-555-5678")] },
    Insert { table: CUSTOMER, values: &[I(4), T("Michael"), T("Brown"), D("1988-08-08"), T("michael.brown@example.com"), T("905-555-9012")] },
    Insert { table: CUSTOMER, values: &[I(5), T("Sophia"), T("Davis"), D("1993-01-25"), T("sophia.davis@example.com"), T("416-555-2345")] },

    Insert { table: RENTAL, values: &[I(1), I(1), I(1), I(1), I(1), D("2024-11-20"), D("2024-11-23")] },
    Insert { table: RENTAL, values: &[I(2), I(2), I(2), I(2), I(3), D("2024-11-15"), D("2024-11-18")] },
    Insert { table: RENTAL, values: &[I(3), I(3), I(3), I(3), I(4), D("2024-11-10"), D("2024-11-12")] },
    Insert { table: RENTAL, values: &[I(4), I(4), I(4), I(4), I(5), D("2024-11-05"), D("2024-11-08")] },
    Insert { table: RENTAL, values: &[I(5), I(5), I(5), I(5), I(1), D("2024-11-01"), D("2024-11-04")] },

    Insert { table: BILLING, values: &[I(1), I(1), I(1), N("150.00"), D("2024-11-20"), CARD] },
    Insert { table: BILLING, values: &[I(2), I(2), I(2), N("165.00"), D("2024-11-15"), CARD] },
    Insert { table: BILLING, values: &[I(3), I(3), I(3), N("130.00"), D("2024-11-10"), CARD] },
    Insert { table: BILLING, values: &[I(4), I(4), I(4), N("135.00"), D("2024-11-05"), CARD] },
    Insert { table: BILLING, values: &[I(5), I(5), I(5), N("180.00"), D("2024-11-01"), CARD] },

    Insert { table: MAINTENANCE, values: &[I(1), I(1), D("2024-11-10"), T("Oil Change"), N("30.00")] },
    Insert { table: MAINTENANCE, values: &[I(2), I(2), D("2024-11-15"), T("Tire Replacement"), N("120.00")] },
    Insert { table: MAINTENANCE, values: &[I(3), I(3), D("2024-11-20"), T("Battery Check"), N("50.00")] },
    Insert { table: MAINTENANCE, values: &[I(4), I(4), D("2024-11-25"), T("Brake Pads"), N("200.00")] },
    Insert { table: MAINTENANCE, values: &[I(5), I(5), D("2024-11-30"), T("Air Filter Replacement"), N("40.00")] },
];
