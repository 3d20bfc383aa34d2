use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_account_tables::Migration),
            Box::new(m20250101_000002_create_voucher_tables::Migration),
            Box::new(m20250101_000003_create_academic_tables::Migration),
            Box::new(m20250101_000004_create_mark_tables::Migration),
            Box::new(m20250101_000005_create_users_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250101_000001_create_account_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_account_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AccountSubcategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AccountSubcategories::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AccountSubcategories::Name)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AccountSubcategories::Category)
                                .string()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AccountGroupCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AccountGroupCategories::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AccountGroupCategories::Name)
                                .string()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Ledgers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Ledgers::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Ledgers::Name).string().not_null())
                        .col(
                            ColumnDef::new(Ledgers::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Ledgers::SubcategoryId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Ledgers::GroupCategoryId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Ledgers::BalanceType).string().not_null())
                        .col(
                            ColumnDef::new(Ledgers::OpeningBalance)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Ledgers::CurrentBalance)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Ledgers::Description).string().null())
                        .col(
                            ColumnDef::new(Ledgers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Ledgers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Ledgers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_ledgers_subcategory_id")
                        .table(Ledgers::Table)
                        .col(Ledgers::SubcategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_ledgers_is_active")
                        .table(Ledgers::Table)
                        .col(Ledgers::IsActive)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Ledgers::Table).to_owned())
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(AccountGroupCategories::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(Table::drop().table(AccountSubcategories::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum AccountSubcategories {
        Table,
        Id,
        Name,
        Category,
    }

    #[derive(Iden)]
    enum AccountGroupCategories {
        Table,
        Id,
        Name,
    }

    #[derive(Iden)]
    enum Ledgers {
        Table,
        Id,
        Name,
        Code,
        SubcategoryId,
        GroupCategoryId,
        BalanceType,
        OpeningBalance,
        CurrentBalance,
        Description,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000002_create_voucher_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_voucher_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Contras::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Contras::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Contras::VoucherNo)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Contras::Date).date().not_null())
                        .col(
                            ColumnDef::new(Contras::FromLedgerId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Contras::ToLedgerId).big_integer().not_null())
                        .col(ColumnDef::new(Contras::Amount).decimal().not_null())
                        .col(ColumnDef::new(Contras::Description).string().null())
                        .col(
                            ColumnDef::new(Contras::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Journals::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Journals::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Journals::VoucherNo)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Journals::Date).date().not_null())
                        .col(ColumnDef::new(Journals::Description).string().null())
                        .col(
                            ColumnDef::new(Journals::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(JournalLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(JournalLines::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JournalLines::JournalId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(JournalLines::LedgerId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(JournalLines::EntryType).string().not_null())
                        .col(ColumnDef::new(JournalLines::Amount).decimal().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_journal_lines_journal_id")
                        .table(JournalLines::Table)
                        .col(JournalLines::JournalId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Payments::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Payments::VoucherNo)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Payments::Date).date().not_null())
                        .col(
                            ColumnDef::new(Payments::PaidFromLedgerId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Payments::PaidToLedgerId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Payments::Amount).decimal().not_null())
                        .col(ColumnDef::new(Payments::Description).string().null())
                        .col(
                            ColumnDef::new(Payments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(JournalLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Journals::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Contras::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Contras {
        Table,
        Id,
        VoucherNo,
        Date,
        FromLedgerId,
        ToLedgerId,
        Amount,
        Description,
        CreatedAt,
    }

    #[derive(Iden)]
    enum Journals {
        Table,
        Id,
        VoucherNo,
        Date,
        Description,
        CreatedAt,
    }

    #[derive(Iden)]
    enum JournalLines {
        Table,
        Id,
        JournalId,
        LedgerId,
        EntryType,
        Amount,
    }

    #[derive(Iden)]
    enum Payments {
        Table,
        Id,
        VoucherNo,
        Date,
        PaidFromLedgerId,
        PaidToLedgerId,
        Amount,
        Description,
        CreatedAt,
    }
}

mod m20250101_000003_create_academic_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_academic_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AcademicYears::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AcademicYears::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AcademicYears::Year)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(AcademicYears::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Exams::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Exams::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Exams::Name).string().not_null())
                        .col(
                            ColumnDef::new(Exams::AcademicYearId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Exams::StartDate).date().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ClassConfigs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ClassConfigs::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ClassConfigs::ClassName).string().not_null())
                        .col(ColumnDef::new(ClassConfigs::Section).string().null())
                        .col(
                            ColumnDef::new(ClassConfigs::AcademicYearId)
                                .big_integer()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Students::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Students::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Students::Name).string().not_null())
                        .col(ColumnDef::new(Students::RollNo).integer().not_null())
                        .col(
                            ColumnDef::new(Students::ClassConfigId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Students::AcademicYearId)
                                .big_integer()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_students_class_roll")
                        .table(Students::Table)
                        .col(Students::ClassConfigId)
                        .col(Students::RollNo)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Students::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ClassConfigs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Exams::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(AcademicYears::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum AcademicYears {
        Table,
        Id,
        Year,
        IsActive,
    }

    #[derive(Iden)]
    enum Exams {
        Table,
        Id,
        Name,
        AcademicYearId,
        StartDate,
    }

    #[derive(Iden)]
    enum ClassConfigs {
        Table,
        Id,
        ClassName,
        Section,
        AcademicYearId,
    }

    #[derive(Iden)]
    enum Students {
        Table,
        Id,
        Name,
        RollNo,
        ClassConfigId,
        AcademicYearId,
    }
}

mod m20250101_000004_create_mark_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_mark_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MarkTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MarkTypes::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MarkTypes::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(MarkTypes::MaxMark).decimal().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SubjectMarkConfigs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SubjectMarkConfigs::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SubjectMarkConfigs::ExamId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SubjectMarkConfigs::ClassConfigId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SubjectMarkConfigs::SubjectName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SubjectMarkConfigs::MaxMark)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SubjectMarkConfigs::PassMark)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SubjectMarkConfigs::IsCompulsory)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_subject_mark_configs_exam_class")
                        .table(SubjectMarkConfigs::Table)
                        .col(SubjectMarkConfigs::ExamId)
                        .col(SubjectMarkConfigs::ClassConfigId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SubjectMarks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SubjectMarks::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SubjectMarks::ExamId).big_integer().not_null())
                        .col(
                            ColumnDef::new(SubjectMarks::StudentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SubjectMarks::SubjectConfigId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SubjectMarks::ObtainedMark)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SubjectMarks::IsAbsent)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_subject_marks_student_subject")
                        .table(SubjectMarks::Table)
                        .col(SubjectMarks::StudentId)
                        .col(SubjectMarks::SubjectConfigId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(GradeRules::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GradeRules::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(GradeRules::GradeName).string().not_null())
                        .col(ColumnDef::new(GradeRules::MinMark).decimal().not_null())
                        .col(ColumnDef::new(GradeRules::MaxMark).decimal().not_null())
                        .col(ColumnDef::new(GradeRules::GradePoint).decimal().null())
                        .col(ColumnDef::new(GradeRules::Remarks).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(BehaviorMarks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BehaviorMarks::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BehaviorMarks::StudentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BehaviorMarks::ExamId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BehaviorMarks::MarkTypeId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BehaviorMarks::Mark).decimal().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BehaviorMarks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(GradeRules::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SubjectMarks::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SubjectMarkConfigs::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MarkTypes::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum MarkTypes {
        Table,
        Id,
        Name,
        MaxMark,
    }

    #[derive(Iden)]
    enum SubjectMarkConfigs {
        Table,
        Id,
        ExamId,
        ClassConfigId,
        SubjectName,
        MaxMark,
        PassMark,
        IsCompulsory,
    }

    #[derive(Iden)]
    enum SubjectMarks {
        Table,
        Id,
        ExamId,
        StudentId,
        SubjectConfigId,
        ObtainedMark,
        IsAbsent,
    }

    #[derive(Iden)]
    enum GradeRules {
        Table,
        Id,
        GradeName,
        MinMark,
        MaxMark,
        GradePoint,
        Remarks,
    }

    #[derive(Iden)]
    enum BehaviorMarks {
        Table,
        Id,
        StudentId,
        ExamId,
        MarkTypeId,
        Mark,
    }
}

mod m20250101_000005_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        IsActive,
        CreatedAt,
    }
}
