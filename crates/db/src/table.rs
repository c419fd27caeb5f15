use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Customer {
    Table,
    Id,
    AssignedRepId,
    StoreName,
    ContactName,
    FullAddress,
    Phone,
    Email,
    Schedule,
}

#[derive(Iden, Clone)]
pub enum OneOffItem {
    Table,
    Id,
    Kind,
    Date,
    CustomerId,
    RepId,
    Note,
    IsDeleted,
}

#[derive(Iden, Clone)]
pub enum ScheduleEvent {
    Table,
    Id,
    CustomerId,
    Kind,
    Date,
    RunIndex,
    SourceId,
    Status,
    SkippedReason,
    SkippedReasonText,
    CompletedAt,
}
